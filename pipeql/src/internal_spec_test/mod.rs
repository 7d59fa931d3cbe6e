use crate::{compile_with_options, usererror::UserError, CompileOptions};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("compile test failed for test {test}: expected {expected}, actual {actual}")]
    CompileTest {
        test: String,
        expected: String,
        actual: String,
    },
    #[error("failed to read directory: {0}")]
    InvalidDirectory(String),
    #[error("failed to load file paths: {0}")]
    InvalidFilePath(String),
    #[error("unable to read file to string: {0}")]
    CannotReadFileToString(String),
    #[error("unable to deserialize YAML file: {0}")]
    CannotDeserializeYaml(String),
    #[error("test {0} must specify exactly one of result and error_code")]
    InvalidTest(String),
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct YamlTest {
    pub tests: Vec<Test>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Test {
    pub description: String,
    pub collection: Option<String>,
    pub query: String,
    pub result: Option<serde_json::Value>,
    pub error_code: Option<u32>,
    pub skip_reason: Option<String>,
}

pub fn load_file_paths(dir: PathBuf) -> Result<Vec<PathBuf>, Error> {
    let mut paths = vec![];
    let entries = fs::read_dir(dir).map_err(|e| Error::InvalidDirectory(format!("{e:?}")))?;
    for entry in entries {
        let path = entry
            .map_err(|e| Error::InvalidFilePath(format!("{e:?}")))?
            .path();
        if path.extension().is_some_and(|ext| ext == "yml") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn parse_yaml(path: &PathBuf) -> Result<YamlTest, Error> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::CannotReadFileToString(format!("{e:?}")))?;
    serde_yaml::from_str(&contents).map_err(|e| Error::CannotDeserializeYaml(format!("{e:?}")))
}

fn run_one(test: Test) -> Result<(), Error> {
    let options = match test.collection {
        Some(collection) => CompileOptions::new(collection),
        None => CompileOptions::default(),
    };
    let actual = compile_with_options(&test.query, &options)
        .map(|pipeline| pipeline.to_bson().into_relaxed_extjson())
        .map_err(|e| e.code());
    let expected = match (test.result, test.error_code) {
        (Some(result), None) => Ok(result),
        (None, Some(code)) => Err(code),
        _ => return Err(Error::InvalidTest(test.description)),
    };
    if expected != actual {
        return Err(Error::CompileTest {
            test: test.description,
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        });
    }
    Ok(())
}

#[test]
pub fn run_spec_tests() -> Result<(), Error> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/spec_tests");
    let paths = load_file_paths(dir)?;
    assert!(!paths.is_empty(), "no spec test files found");
    for path in paths {
        for test in parse_yaml(&path)?.tests {
            if test.skip_reason.is_some() {
                continue;
            }
            run_one(test)?;
        }
    }
    Ok(())
}
