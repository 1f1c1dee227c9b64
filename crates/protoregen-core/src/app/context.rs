use std::sync::Arc;

use crate::ports::{CommandRunner, HashStore};

/// Shared resources handed to every task.
#[derive(Clone)]
pub struct Context {
    runner: Arc<dyn CommandRunner>,
    hashes: Arc<dyn HashStore>,
}

impl Context {
    pub fn new(runner: Arc<dyn CommandRunner>, hashes: Arc<dyn HashStore>) -> Self {
        Self { runner, hashes }
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    pub fn hashes(&self) -> &dyn HashStore {
        self.hashes.as_ref()
    }
}
