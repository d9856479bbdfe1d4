//! Common test utilities and helpers

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SCENARIO_CORPUS: &str = "the cat sat on the mat\nthe cat ran\n";

/// Expected output table for [`SCENARIO_CORPUS`] excluding `on` with K = 3
pub const SCENARIO_TABLE: &str = "     Word     Frequency\n\
                                  -----------------------\n  \
                                  1. the      3\n  \
                                  2. cat      2\n  \
                                  3. mat      1\n\
                                  -----------------------\n";

/// Builder for a directory holding a corpus, an exclusion list and outputs
pub struct PipelineFixtureBuilder {
    temp_dir: TempDir,
    corpus: String,
    exclusion: String,
    config: Option<String>,
}

impl PipelineFixtureBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            corpus: String::new(),
            exclusion: String::new(),
            config: None,
        })
    }

    pub fn with_corpus(mut self, corpus: &str) -> Self {
        self.corpus = corpus.to_string();
        self
    }

    pub fn with_exclusion(mut self, exclusion: &str) -> Self {
        self.exclusion = exclusion.to_string();
        self
    }

    /// Write `lexan.toml` into the fixture directory
    pub fn with_config(mut self, config: &str) -> Self {
        self.config = Some(config.to_string());
        self
    }

    pub fn build(self) -> Result<PipelineFixture> {
        let path = self.temp_dir.path();
        fs::write(path.join("corpus.txt"), &self.corpus)?;
        fs::write(path.join("exclude.txt"), &self.exclusion)?;
        fs::create_dir(path.join("channels"))?;
        if let Some(config) = &self.config {
            fs::write(path.join("lexan.toml"), config)?;
        }
        Ok(PipelineFixture {
            temp_dir: self.temp_dir,
        })
    }
}

pub struct PipelineFixture {
    temp_dir: TempDir,
}

impl PipelineFixture {
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn corpus(&self) -> PathBuf {
        self.path().join("corpus.txt")
    }

    pub fn exclusion(&self) -> PathBuf {
        self.path().join("exclude.txt")
    }

    pub fn channel_root(&self) -> PathBuf {
        self.path().join("channels")
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.output(name)).unwrap()
    }

    /// Namespaces left under the channel root
    pub fn leftover_namespaces(&self) -> Vec<PathBuf> {
        fs::read_dir(self.channel_root())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    /// A bare `lexan` invocation isolated from the caller's environment
    pub fn lexan(&self) -> Command {
        let mut cmd = Command::cargo_bin("lexan").unwrap();
        cmd.current_dir(self.path())
            .env_remove("LEXAN_SPLITTERS")
            .env_remove("LEXAN_BUILDERS")
            .env_remove("LEXAN_TOP_K")
            .env_remove("LEXAN_CHANNEL_ROOT")
            .env_remove("LEXAN_LOG");
        cmd
    }

    /// `lexan run` with input, exclusion, channel root and output filled in
    pub fn run(&self, output: &str, splitters: usize, builders: usize, top_k: usize) -> Command {
        let mut cmd = self.lexan();
        cmd.arg("run")
            .arg("-i")
            .arg(self.corpus())
            .arg("-e")
            .arg(self.exclusion())
            .arg("-o")
            .arg(self.output(output))
            .arg("-l")
            .arg(splitters.to_string())
            .arg("-m")
            .arg(builders.to_string())
            .arg("-t")
            .arg(top_k.to_string())
            .arg("--channel-root")
            .arg(self.channel_root());
        cmd
    }
}

/// Parse the rows of an output table back into `(word, count)`
pub fn table_rows(table: &str) -> Vec<(String, u64)> {
    table
        .lines()
        .skip(2)
        .filter(|line| !line.starts_with('-'))
        .map(|line| {
            let mut fields = line.split_whitespace().skip(1);
            let word = fields.next().unwrap().to_string();
            let count = fields.next().unwrap().parse().unwrap();
            (word, count)
        })
        .collect()
}
