use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use serde_json::Value;
use tempfile::TempDir;

mod init;
mod lookup;
mod unused;
mod usages;

const BIN_NAME: &str = "dictscope";

pub const DICTIONARY: &str = r#"[
  {
    "key": "app",
    "content": {
      "hero": {
        "title": { "nodeType": "translation", "translation": { "en": "Welcome  home", "fr": "Bienvenue" } },
        "subtitle": "Sub"
      },
      "count": 3,
      "unusedLeaf": "x"
    },
    "filePath": "src/app.content.ts",
    "location": "local"
  }
]"#;

pub const CONTENT: &str = r#"import { t, type Dictionary } from "intlayer";

const appContent = {
  key: "app",
  content: {
    hero: {
      title: t({ en: "Welcome  home", fr: "Bienvenue" }),
      subtitle: "Sub",
    },
    count: 3,
    unusedLeaf: "x",
  },
} satisfies Dictionary;

export default appContent;
"#;

pub const APP: &str = r#"import { useIntlayer } from "react-intlayer";

export const App = () => {
  const content = useIntlayer("app");
  return (
    <div>
      <h1>{content.hero.title}</h1>
      <p>{content.hero.subtitle.value}</p>
    </div>
  );
};
"#;

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// A git-rooted Intlayer project with one dictionary, its content
    /// declaration and a component reading it.
    pub fn intlayer_project() -> Result<Self> {
        let test = Self::new()?;
        fs::create_dir_all(test.project_dir.join(".git"))?;
        test.write_file(
            "package.json",
            r#"{ "dependencies": { "intlayer": "^7.0.0", "react-intlayer": "^7.0.0" } }"#,
        )?;
        test.write_file(".intlayer/unmerged_dictionary/app.json", DICTIONARY)?;
        test.write_file("src/app.content.ts", CONTENT)?;
        test.write_file("src/App.tsx", APP)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn path(&self, rel: &str) -> String {
        self.project_dir.join(rel).to_string_lossy().to_string()
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    /// Run `args` with `--json` and parse stdout.
    pub fn json(&self, args: &[&str]) -> Result<(Output, Value)> {
        let output = self.command().args(args).arg("--json").output()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let value = serde_json::from_str(&stdout).with_context(|| {
            format!(
                "stdout is not JSON: {}\nstderr: {}",
                stdout,
                String::from_utf8_lossy(&output.stderr)
            )
        })?;
        Ok((output, value))
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}
