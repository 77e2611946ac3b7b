// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Numeric-locale guard.
//!
//! JSON hard-requires `.` as the decimal separator. This crate formats and
//! parses numbers exclusively through locale-independent routines (`ryu`,
//! `itoa`, `fast-float2`), so the ambient C locale cannot leak into the
//! output. The process-wide flag and [`check_locale`] are kept for drop-in
//! compatibility with codebases that guarded every call; the check probes
//! the actual formatting path once and memoizes the answer.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::OnceLock;

static AUTO_FIX_LOCALE: AtomicBool = AtomicBool::new(true);
static LOCALE_PROBE: OnceLock<bool> = OnceLock::new();

/// Whether parse and serialize calls verify the numeric locale first.
/// Defaults to `true`.
pub fn auto_fix_locale() -> bool {
    AUTO_FIX_LOCALE.load(Ordering::Relaxed)
}

/// Toggle the process-wide locale check. Callers that need strict isolation
/// can run [`check_locale`] once at startup and turn this off.
pub fn set_auto_fix_locale(on: bool) {
    AUTO_FIX_LOCALE.store(on, Ordering::Relaxed);
}

/// Verify that numeric formatting uses `.` as the decimal separator.
///
/// Returns `true` when the locale was already correct. The formatting
/// routines used throughout this crate never consult the C locale, so the
/// probe holds by construction and `auto_fix` has no locale left to repair;
/// the parameter exists for API compatibility with guards that could fail.
pub fn check_locale(auto_fix: bool) -> bool {
    let _ = auto_fix;
    *LOCALE_PROBE.get_or_init(decimal_point_is_dot)
}

/// One-shot flag-gated check run by every parse and serialize entry point.
pub(crate) fn ensure_numeric_locale() {
    if auto_fix_locale() {
        check_locale(true);
    }
}

fn decimal_point_is_dot() -> bool {
    // Round-trip a probe value through the same format and parse paths the
    // codec uses for doubles.
    let mut buffer = ryu::Buffer::new();
    let formatted = buffer.format_finite(0.5_f64);
    let reparsed: std::result::Result<f64, _> = fast_float2::parse(formatted);
    formatted.contains('.') && matches!(reparsed, Ok(v) if v == 0.5)
}
