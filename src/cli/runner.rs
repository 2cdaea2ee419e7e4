//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::Settings;
use crate::database::DatabaseEngine;
use crate::error::Result;
use crate::extract::NeoWsExtractor;
use crate::parser::BatchAssembler;
use crate::pipeline::Pipeline;
use crate::storage::JsonStore;
use serde::Serialize;
use serde_json::json;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let settings = Settings::load(self.cli.config.as_deref())?;
        tracing::debug!(
            data_dir = %settings.data_dir.display(),
            database = %settings.database.path,
            table = %settings.database.table,
            "Loaded settings"
        );

        match &self.cli.command {
            Commands::Extract { start, end } => {
                self.extract(&settings, start, end.as_deref()).await
            }
            Commands::Load { file } => self.load(&settings, file),
            Commands::Create => self.create(&settings),
            Commands::Pipeline { start, end } => {
                self.pipeline(&settings, start, end.as_deref()).await
            }
            Commands::Files => self.files(&settings),
            Commands::Parse { file } => self.parse(&settings, file),
        }
    }

    async fn extract(&self, settings: &Settings, start: &str, end: Option<&str>) -> Result<()> {
        let extractor = NeoWsExtractor::from_settings(settings)?;
        let outcome = extractor.extract(start, end).await?;
        self.emit(&outcome);
        Ok(())
    }

    fn load(&self, settings: &Settings, file: &str) -> Result<()> {
        let mut pipeline = Pipeline::from_settings(settings)?;
        let report = pipeline.load_file(file)?;
        self.emit(&report);
        Ok(())
    }

    fn create(&self, settings: &Settings) -> Result<()> {
        let engine = DatabaseEngine::open(&settings.database.path, &settings.database.table)?;
        engine.create_table()?;
        self.emit(&json!({
            "database": engine.location(),
            "table": engine.table(),
            "created": true,
        }));
        Ok(())
    }

    async fn pipeline(&self, settings: &Settings, start: &str, end: Option<&str>) -> Result<()> {
        let mut pipeline = Pipeline::from_settings(settings)?;
        let report = pipeline.run(start, end).await?;
        self.emit(&report);
        Ok(())
    }

    fn files(&self, settings: &Settings) -> Result<()> {
        println!("{}", self.render_files(settings)?);
        Ok(())
    }

    fn render_files(&self, settings: &Settings) -> Result<String> {
        let store = JsonStore::new(&settings.data_dir);
        Ok(self.render(&store.list_files()?))
    }

    fn parse(&self, settings: &Settings, file: &str) -> Result<()> {
        let assembler = BatchAssembler::new(JsonStore::new(&settings.data_dir));
        for record in assembler.process_file(file)? {
            self.emit(&record);
        }
        Ok(())
    }

    /// Print one value in the selected format
    fn emit<T: Serialize>(&self, value: &T) {
        println!("{}", self.render(value));
    }

    fn render<T: Serialize>(&self, value: &T) -> String {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        };
        line.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    fn runner(args: &[&str]) -> Runner {
        Runner::new(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_files_follows_output_format() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("NeoWs_json_2024-01-08_2024-01-15.json"), "{}").unwrap();
        std::fs::write(dir.path().join("NeoWs_json_2024-01-01_2024-01-08.json"), "{}").unwrap();

        let settings = Settings {
            data_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };

        let json = runner(&["neows", "files"]).render_files(&settings).unwrap();
        assert_eq!(
            json,
            r#"["NeoWs_json_2024-01-01_2024-01-08.json","NeoWs_json_2024-01-08_2024-01-15.json"]"#
        );

        let pretty = runner(&["neows", "-f", "pretty", "files"])
            .render_files(&settings)
            .unwrap();
        assert!(pretty.starts_with("[\n  \"NeoWs_json_2024-01-01_2024-01-08.json\","));
    }

    #[test]
    fn test_files_empty_data_dir() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            data_dir: dir.path().join("missing"),
            ..Settings::default()
        };

        assert_eq!(runner(&["neows", "files"]).render_files(&settings).unwrap(), "[]");
    }
}
