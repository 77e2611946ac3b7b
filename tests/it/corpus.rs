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

//! File corpus runner: `pass*.json` must parse, `fail*.json` must not, and
//! `round*.json` must re-serialize byte-identically after trimming.

use std::fs;
use std::path::PathBuf;

use bigjson::{parse_utf8, to_utf8, ParseOption, SerOption};

fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/it/testdata")
}

#[test]
fn test_corpus_files() {
    let mut ran = 0;
    for entry in fs::read_dir(testdata_dir()).unwrap() {
        let path = entry.unwrap().path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if !name.ends_with(".json") {
            continue;
        }
        let data = fs::read(&path).unwrap();
        let result = parse_utf8(&data, ParseOption::AcceptAnyValue);

        if name.starts_with("fail") {
            assert!(result.is_err(), "{name}: expected a parse error");
        } else if name.starts_with("pass") {
            result.unwrap_or_else(|e| panic!("{name}: {e}"));
        } else if name.starts_with("round") {
            let value = result.unwrap_or_else(|e| panic!("{name}: {e}"));
            let out = to_utf8(&value, true, SerOption::BareNullOk).unwrap();
            assert_eq!(
                String::from_utf8(out).unwrap().trim(),
                String::from_utf8(data).unwrap().trim(),
                "{name}: round-trip mismatch"
            );
        } else {
            continue;
        }
        ran += 1;
    }
    assert!(ran > 0, "no corpus files found in {:?}", testdata_dir());
}
