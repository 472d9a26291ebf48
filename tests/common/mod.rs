//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use clibase::config::Settings;
use clibase::infrastructure::di::ServiceContainer;
use clibase::infrastructure::traits::{MapEnv, Prompt, RealFileSystem};

/// Prompt that replays scripted answers and counts how often it was asked.
#[derive(Default)]
pub struct ScriptedPrompt {
    texts: Mutex<VecDeque<io::Result<String>>>,
    confirms: Mutex<VecDeque<bool>>,
    asked: Mutex<usize>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next `ask_text` / `ask_secret`.
    pub fn answer(self, value: &str) -> Self {
        self.texts.lock().unwrap().push_back(Ok(value.to_string()));
        self
    }

    /// Queue a cancelled prompt (Ctrl-C).
    pub fn interrupt(self) -> Self {
        self.texts
            .lock()
            .unwrap()
            .push_back(Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted")));
        self
    }

    pub fn confirm(self, yes: bool) -> Self {
        self.confirms.lock().unwrap().push_back(yes);
        self
    }

    pub fn times_asked(&self) -> usize {
        *self.asked.lock().unwrap()
    }

    fn next_text(&self) -> io::Result<String> {
        *self.asked.lock().unwrap() += 1;
        self.texts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer")))
    }
}

impl Prompt for ScriptedPrompt {
    fn ask_text(&self, _label: &str) -> io::Result<String> {
        self.next_text()
    }

    fn ask_secret(&self, _label: &str) -> io::Result<String> {
        self.next_text()
    }

    fn ask_confirm(&self, _label: &str) -> io::Result<bool> {
        *self.asked.lock().unwrap() += 1;
        self.confirms
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer"))
    }
}

/// Isolated config dir + working dir under one temp root.
pub struct Sandbox {
    pub root: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        clibase::util::testing::init_test_setup();
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("work")).unwrap();
        Self { root }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.path().join("config")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root.path().join("work")
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join("config.json")
    }

    pub fn settings(&self) -> Settings {
        Settings {
            config_dir: self.config_dir(),
            work_dir: self.work_dir(),
        }
    }

    pub fn write_work_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work_dir().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn write_config(&self, content: &str) {
        std::fs::create_dir_all(self.config_dir()).unwrap();
        std::fs::write(self.config_path(), content).unwrap();
    }

    pub fn read_config(&self) -> Option<String> {
        std::fs::read_to_string(self.config_path()).ok()
    }

    pub fn stored_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.read_config().expect("config file exists")).unwrap()
    }

    pub fn container(&self, env: MapEnv, prompt: Arc<ScriptedPrompt>) -> ServiceContainer {
        ServiceContainer::with_deps(
            self.settings(),
            Arc::new(RealFileSystem),
            Arc::new(env),
            prompt,
        )
    }
}

pub fn exists(path: &Path) -> bool {
    path.exists()
}
