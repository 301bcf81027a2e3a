use anyhow::{Context, Result, bail};
use handlebars::Handlebars;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::generate::GeneratedModule;
use super::import_script;
use crate::traits::FileSystem;

/// Module name used for the directory layout and Terraform addresses
pub const MODULE_NAME: &str = "twingate";

const PROVIDER_VERSION: &str = ">= 0.1.8";

const MODULE_TEMPLATE: &str = r#"variable "{{module}}_network_name" {
  type = string
  sensitive = true
}
variable "{{module}}_api_key" {
  type = string
  sensitive = true
}

module "{{module}}" {
  source = "./{{module}}"
  network_name = var.{{module}}_network_name
  api_key = var.{{module}}_api_key
}
"#;

const PROVIDER_TEMPLATE: &str = r#"terraform {
  required_providers {
    {{module}} = {
      source = "Twingate/{{module}}"
      version = "{{{provider_version}}}"
    }
  }
}

variable "network_name" {
  type = string
  sensitive = true
}
variable "api_key" {
  type = string
  sensitive = true
}

provider "{{module}}" {
  api_token = var.api_key
  network   = var.network_name
}
"#;

/// The two root-module variables plus any extra key-value pairs,
/// validated at construction.
#[derive(Debug, Clone)]
pub struct TfVariables {
    network_name: String,
    api_key: String,
    extra: BTreeMap<String, String>,
}

impl TfVariables {
    pub fn new(network_name: &str, api_key: &str) -> Result<Self> {
        if network_name.trim().is_empty() {
            bail!("Network name must not be empty");
        }
        if api_key.trim().is_empty() {
            bail!("API key must not be empty");
        }

        Ok(Self {
            network_name: network_name.to_string(),
            api_key: api_key.to_string(),
            extra: BTreeMap::new(),
        })
    }

    /// Add an extra tfvars entry
    #[allow(dead_code)]
    pub fn with_extra(mut self, key: &str, value: &str) -> Self {
        self.extra.insert(key.to_string(), value.to_string());
        self
    }

    /// Serialize to the `.auto.tfvars.json` object
    pub fn to_json(&self) -> Result<String> {
        let mut object = serde_json::Map::new();
        object.insert(
            format!("{}_network_name", MODULE_NAME),
            json!(self.network_name),
        );
        object.insert(format!("{}_api_key", MODULE_NAME), json!(self.api_key));
        for (key, value) in &self.extra {
            object.insert(key.clone(), json!(value));
        }

        serde_json::to_string(&serde_json::Value::Object(object))
            .context("Failed to serialize tfvars")
    }
}

/// Root module declaration: two sensitive variables and one module block
pub fn module_file() -> Result<String> {
    Handlebars::new()
        .render_template(MODULE_TEMPLATE, &json!({ "module": MODULE_NAME }))
        .context("Failed to render module template")
}

/// Provider file for the module directory
pub fn provider_file() -> Result<String> {
    Handlebars::new()
        .render_template(
            PROVIDER_TEMPLATE,
            &json!({ "module": MODULE_NAME, "provider_version": PROVIDER_VERSION }),
        )
        .context("Failed to render provider template")
}

/// Paths of the written files that the caller reports on
pub struct ModuleLayout {
    pub tfvars: PathBuf,
    pub import_script: PathBuf,
}

/// Persist the generated module under `output_dir`.
///
/// Writes are sequential; a failed write propagates and leaves the files
/// written so far on disk.
pub fn write_module(
    fs: &dyn FileSystem,
    output_dir: &Path,
    generated: &GeneratedModule,
    variables: &TfVariables,
) -> Result<ModuleLayout> {
    let module_dir = output_dir.join(MODULE_NAME);
    fs.create_dir_all(&module_dir)?;

    let tfvars = output_dir.join(format!("{}.auto.tfvars.json", MODULE_NAME));
    fs.write(
        &output_dir.join(format!("{}-module.tf", MODULE_NAME)),
        &module_file()?,
    )?;
    fs.write(&tfvars, &variables.to_json()?)?;
    fs.write(
        &module_dir.join(format!("{}-provider.tf", MODULE_NAME)),
        &provider_file()?,
    )?;
    fs.write(
        &module_dir.join(format!("{}.tf", MODULE_NAME)),
        &generated.content,
    )?;

    let import_script = if cfg!(windows) {
        let path = output_dir.join(format!("import-{}.bat", MODULE_NAME));
        fs.write(&path, &import_script::script_body_windows(&generated.imports))?;
        path
    } else {
        let path = output_dir.join(format!("import-{}.sh", MODULE_NAME));
        fs.write_executable(&path, &import_script::script_body_unix(&generated.imports))?;
        path
    };

    Ok(ModuleLayout {
        tfvars,
        import_script,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockFileSystem;

    fn sample_generated() -> GeneratedModule {
        GeneratedModule {
            content: "# module content\n".to_string(),
            imports: vec![
                "terraform import module.twingate.twingate_remote_network.HQ net1".to_string(),
            ],
        }
    }

    #[test]
    fn test_tf_variables_rejects_empty_inputs() {
        assert!(TfVariables::new("", "key").is_err());
        assert!(TfVariables::new("acme", "  ").is_err());
        assert!(TfVariables::new("acme", "key").is_ok());
    }

    #[test]
    fn test_tf_variables_json_includes_extras() {
        let variables = TfVariables::new("acme", "secret")
            .unwrap()
            .with_extra("twingate_aws_region", "us-east-1");

        let parsed: serde_json::Value = serde_json::from_str(&variables.to_json().unwrap()).unwrap();

        assert_eq!(parsed["twingate_network_name"], "acme");
        assert_eq!(parsed["twingate_api_key"], "secret");
        assert_eq!(parsed["twingate_aws_region"], "us-east-1");
    }

    #[test]
    fn test_module_file_declares_sensitive_variables() {
        let rendered = module_file().unwrap();

        assert!(rendered.contains("variable \"twingate_network_name\""));
        assert!(rendered.contains("variable \"twingate_api_key\""));
        assert!(rendered.contains("module \"twingate\""));
        assert_eq!(rendered.matches("sensitive = true").count(), 2);
    }

    #[test]
    fn test_provider_file_pins_provider_version() {
        let rendered = provider_file().unwrap();

        assert!(rendered.contains("source = \"Twingate/twingate\""));
        assert!(rendered.contains("version = \">= 0.1.8\""));
        assert!(rendered.contains("provider \"twingate\""));
    }

    #[test]
    fn test_write_module_produces_expected_layout() {
        let fs = MockFileSystem::new();
        let variables = TfVariables::new("acme", "secret").unwrap();

        let layout = write_module(&fs, Path::new("out"), &sample_generated(), &variables).unwrap();

        assert!(fs.has_file(Path::new("out/twingate-module.tf")));
        assert!(fs.has_file(Path::new("out/twingate.auto.tfvars.json")));
        assert!(fs.has_file(Path::new("out/twingate/twingate-provider.tf")));
        assert!(fs.has_file(Path::new("out/twingate/twingate.tf")));
        assert_eq!(fs.list_files().len(), 5);

        assert_eq!(layout.tfvars, Path::new("out/twingate.auto.tfvars.json"));

        let script = fs.get_file_contents(&layout.import_script).unwrap();
        if cfg!(windows) {
            assert_eq!(layout.import_script, Path::new("out/import-twingate.bat"));
        } else {
            assert_eq!(layout.import_script, Path::new("out/import-twingate.sh"));
            assert!(script.starts_with("#!/bin/sh\n"));
            assert!(fs.is_executable(&layout.import_script));
        }
        assert!(script.contains("terraform import module.twingate.twingate_remote_network.HQ net1"));
    }

    #[test]
    #[cfg(unix)]
    fn test_import_script_is_executable_on_disk() {
        use crate::traits::{FileSystem, RealFileSystem};
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import-twingate.sh");
        RealFileSystem
            .write_executable(&path, "#!/bin/sh\necho ok")
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o755, 0o755);
    }
}
