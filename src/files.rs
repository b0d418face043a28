//! Reading the source and syntax tree inputs.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use shapefinder_ast::Ast;
use shapefinder_core::error::ShapeError;

/// Path argument meaning standard input.
pub const STDIN: &str = "-";

/// Where the ESTree document for `source` lives when none is given:
/// `<source-without-extension>.estree.json`.
pub fn default_tree_path(source: &Path) -> PathBuf {
    source.with_extension("estree.json")
}

/// Read a UTF-8 file, mapping a missing file to `FileNotFound`.
pub fn read_file(path: &Path) -> Result<String, ShapeError> {
    fs::read_to_string(path).map_err(|e| io_error(path, e))
}

/// Read `path`, or standard input when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String, ShapeError> {
    if path.as_os_str() == STDIN {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| io_error(Path::new("<stdin>"), e))?;
        return Ok(buf);
    }
    read_file(path)
}

/// Read the source file and its tree, then build the [`Ast`].
pub fn load_ast(source_path: &Path, tree_path: Option<&Path>) -> Result<Ast, ShapeError> {
    let source = read_file(source_path)?;
    let tree_path = tree_path.map_or_else(|| default_tree_path(source_path), Path::to_path_buf);
    let json = read_input(&tree_path)?;
    let ast = Ast::from_estree_json(source, &json)?;
    tracing::debug!(
        source = %source_path.display(),
        tree = %tree_path.display(),
        nodes = ast.len(),
        "loaded syntax tree"
    );
    Ok(ast)
}

fn io_error(path: &Path, err: io::Error) -> ShapeError {
    if err.kind() == io::ErrorKind::NotFound {
        ShapeError::file_not_found(path.display().to_string())
    } else {
        ShapeError::ReadError {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
