//! `interactions make <Name>` - stub generator

use std::fs;
use std::path::{Path, PathBuf};

use heck::{ToSnakeCase, ToUpperCamelCase};

pub const DEFAULT_DIR: &str = "src/interactions";

const TEMPLATE: &str = r#"use interactions_core::{Input, Interaction, Rejection, Rules};

#[derive(Debug, Default)]
pub struct {{struct}};

impl Interaction for {{struct}} {
    const NAME: &'static str = "{{struct}}";
    type Output = ();

    fn validations(&self) -> Rules {
        Rules::new()
    }

    fn execute(&self, _input: &Input<'_>) -> Result<Self::Output, Rejection> {
        Ok(())
    }
}
"#;

/// Writes `dir/<snake_name>.rs` and returns its path.
///
/// Refuses to overwrite an existing file unless `force` is set. When
/// `dir/mod.rs` exists the module is declared there too.
pub fn run(name: &str, dir: &Path, force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let struct_name = struct_name(name)?;
    let module = struct_name.to_snake_case();
    let path = dir.join(format!("{module}.rs"));

    if path.exists() && !force {
        return Err(format!("{} already exists (use --force to overwrite)", path.display()).into());
    }

    fs::create_dir_all(dir)?;
    fs::write(&path, render(&struct_name))?;
    tracing::debug!(path = %path.display(), "wrote interaction stub");

    let mod_rs = dir.join("mod.rs");
    if mod_rs.exists() {
        declare_module(&mod_rs, &module)?;
    }

    Ok(path)
}

fn struct_name(raw: &str) -> Result<String, Box<dyn std::error::Error>> {
    let name = raw.trim().to_upper_camel_case();
    let valid = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric());
    if !valid {
        return Err(format!("'{raw}' is not a valid interaction name").into());
    }
    Ok(name)
}

fn render(struct_name: &str) -> String {
    TEMPLATE.replace("{{struct}}", struct_name)
}

fn declare_module(mod_rs: &Path, module: &str) -> std::io::Result<()> {
    let line = format!("pub mod {module};");
    let mut contents = fs::read_to_string(mod_rs)?;
    if contents.lines().any(|l| l.trim() == line) {
        return Ok(());
    }
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(&line);
    contents.push('\n');
    fs::write(mod_rs, contents)
}
