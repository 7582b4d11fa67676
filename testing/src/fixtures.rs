use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use tempfile::TempDir;

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn unique_id(prefix: &str) -> String {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", prefix, id)
}

/// Three-node cluster that passes every check.
pub const VALID_CLUSTER: &str = "\
cluster-definition:
  - role: admin
  - role: mon1
  - role: osd
types: [t2.micro, t2.small, t2.medium]
role-definitions:
  admin:
    last-octet: 10
  mon1:
    last-octet: 11
  osd:
    last-octet: 14
    type: t2.medium
";

/// Cluster definition that names `mon1` twice.
pub const DUPLICATE_ROLE_CLUSTER: &str = "\
cluster-definition:
  - role: mon1
  - role: mon1
";

/// Role definition with an attribute outside the template.
pub const BOGUS_ATTRIBUTE_ROLES: &str = "\
role-definitions:
  osd:
    bogus: 1
";

/// A YAML file in its own temporary directory.
pub struct YamlFixture {
    #[allow(dead_code)]
    dir: TempDir,
    path: PathBuf
}

impl YamlFixture {
    /// Path of a file that does not exist yet.
    pub fn missing() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join(format!("{}.yaml", unique_id("aws")));
        tracing::debug!("YAML fixture at {:?}", path);
        Self { dir, path }
    }

    pub fn with_contents(contents: &str) -> Self {
        let fixture = Self::missing();
        fixture.write(contents);
        fixture
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, contents: &str) {
        std::fs::write(&self.path, contents).expect("write YAML fixture");
    }

    pub fn contents(&self) -> String {
        std::fs::read_to_string(&self.path).unwrap_or_default()
    }
}
