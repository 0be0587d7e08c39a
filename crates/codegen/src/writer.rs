//! Rendering and delivery of the generated client.
//!
//! Rendered output starts with a provenance header whose last line carries the
//! sha256 of everything after the header. [`is_pristine`] uses it to tell a
//! generated file from one that was edited by hand.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::codegen::EmittedContract;
use crate::error::WriteError;

/// Fixed lines that open every generated file.
pub const HEADER: &str = "/* eslint-disable */\n/* tslint:disable */\n/* Generated by juno-codegen. DO NOT EDIT */\n";

const DIGEST_PREFIX: &str = "// @generated sha256:";

/// Label used in errors for sinks that are not files.
pub const STREAM_LABEL: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

fn digest(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

/// Header, digest line and module source.
pub fn render(contract: &EmittedContract) -> String {
    let body = contract.body();
    let digest = digest(&body);
    debug!(digest = %digest, body_len = body.len(), "Rendered generated client.");
    format!("{HEADER}{DIGEST_PREFIX}{digest}\n{body}")
}

/// Whether `text` is generated output that has not been modified since.
pub fn is_pristine(text: &str) -> bool {
    let Some(rest) = text.strip_prefix(HEADER) else {
        return false;
    };
    let Some((digest_line, body)) = rest.split_once('\n') else {
        return false;
    };
    digest_line
        .strip_prefix(DIGEST_PREFIX)
        .is_some_and(|recorded| recorded == digest(body))
}

/// Write the rendered contract to an arbitrary sink and flush it.
pub fn write(contract: &EmittedContract, mut sink: impl Write) -> Result<(), WriteError> {
    let rendered = render(contract);
    sink.write_all(rendered.as_bytes())
        .and_then(|()| sink.flush())
        .map_err(|err| WriteError::sink(STREAM_LABEL, err))
}

/// Whether `path` already holds exactly `rendered`. A missing file is not up to date.
pub fn is_up_to_date(rendered: &str, path: &Path) -> Result<bool, WriteError> {
    match fs::read(path) {
        Ok(existing) => Ok(existing == rendered.as_bytes()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(WriteError::sink(path, err)),
    }
}

/// Write the rendered contract to `path`.
///
/// The file is left alone when its content is already identical. Otherwise the
/// output goes to a temporary file in the same directory which then replaces
/// `path`, so readers never see a partial file.
pub fn write_to_path(contract: &EmittedContract, path: &Path) -> Result<WriteOutcome, WriteError> {
    let rendered = render(contract);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|err| WriteError::sink(path, err))?;

    if is_up_to_date(&rendered, path)? {
        info!(path = %path.display(), "Generated client unchanged.");
        return Ok(WriteOutcome::Unchanged);
    }

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|err| WriteError::sink(path, err))?;
    tmp.write_all(rendered.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|err| WriteError::sink(path, err))?;
    tmp.persist(path)
        .map_err(|err| WriteError::sink(path, err.error))?;

    debug!(
        path = %path.display(),
        bytes = rendered.len(),
        "Generated client written."
    );
    Ok(WriteOutcome::Written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::codegen::emit;
    use crate::config::GeneratorConfig;
    use crate::schema::{ProcedureDef, RouterBuilder, TypeRef};

    fn contract() -> EmittedContract {
        let router = RouterBuilder::new()
            .procedure(ProcedureDef::query("get_api_version").output(TypeRef::string()))
            .build()
            .unwrap();
        emit(&router, &GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_render_header() {
        let rendered = render(&contract());
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("/* eslint-disable */"));
        assert_eq!(lines.next(), Some("/* tslint:disable */"));
        assert_eq!(lines.next(), Some("/* Generated by juno-codegen. DO NOT EDIT */"));
        let digest_line = lines.next().unwrap();
        let hex = digest_line.strip_prefix(DIGEST_PREFIX).unwrap();
        assert_eq!(hex.len(), 64);
        assert_eq!(lines.next(), Some("import { initTRPC } from \"@trpc/server\";"));
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render(&contract()), render(&contract()));
    }

    #[test]
    fn test_is_pristine() {
        let rendered = render(&contract());
        assert!(is_pristine(&rendered));
        assert!(!is_pristine(&rendered.replace("get_api_version", "get_version")));
        assert!(!is_pristine("export type AppRouter = unknown;\n"));
    }

    #[test]
    fn test_write_to_sink() {
        let mut buf = Vec::new();
        write(&contract(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), render(&contract()));
    }

    #[test]
    fn test_write_to_failing_sink() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let err = write(&contract(), Broken).unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_write_to_path_creates_dirs_and_detects_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server").join("src").join("router.ts");

        assert_eq!(write_to_path(&contract(), &path).unwrap(), WriteOutcome::Written);
        let first = fs::read_to_string(&path).unwrap();
        assert_eq!(first, render(&contract()));

        assert_eq!(write_to_path(&contract(), &path).unwrap(), WriteOutcome::Unchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), first);

        // Only the output file is left behind.
        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_write_to_path_replaces_stale_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("router.ts");
        fs::write(&path, "stale").unwrap();

        assert!(!is_up_to_date(&render(&contract()), &path).unwrap());
        assert_eq!(write_to_path(&contract(), &path).unwrap(), WriteOutcome::Written);
        assert!(is_up_to_date(&render(&contract()), &path).unwrap());
    }

    #[test]
    fn test_write_to_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let err = write_to_path(&contract(), &blocker.join("router.ts")).unwrap_err();
        assert!(matches!(err, WriteError::SinkWriteFailure { .. }));
    }
}
