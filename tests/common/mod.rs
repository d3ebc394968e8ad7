//! Common test utilities for integration tests
//!
//! This module contains shared test fixtures and helper functions used across
//! integration tests. These utilities are not compiled into the library.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test fixture with automatic cleanup
///
/// Stages transcripts and config files in a temporary directory, allowing
/// tests to run in parallel without interfering with each other.
pub struct TestFixture {
    dir: TempDir,
}

impl TestFixture {
    /// Create a new empty fixture directory
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Write `content` to `name` inside the fixture directory and return
    /// the full path
    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Get the path to the fixture directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A chat-style transcript with three fenced blocks: a tagged Python
/// snippet that touches the host API, an untagged generic snippet, and a
/// MEL snippet.
pub const SAMPLE_TRANSCRIPT: &str = "\
Here is how to build a cube:

```python
import maya.cmds as cmds
cmds.polyCube()
```

The same thing without any host calls:

```
print(\"plain\")
```

And the MEL version:

```mel
polyCube;
```

Enjoy!
";
