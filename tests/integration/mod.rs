mod cli_test;
mod error_test;

use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

pub const CONFIG: &str = "\
global:
  selected-app: prod
apps:
  prod:
    provider: acme
    url: https://acme.okta.com/home/amazon_aws/0oa1/272
  staging:
    provider: acme
  orphan:
    url: https://nowhere
  legacy:
    provider: adfs-corp
  untyped-app:
    provider: untyped
providers:
  acme:
    type: okta
    base-url: https://acme.okta.com
  adfs-corp:
    type: adfs
  untyped:
    base-url: https://example.com
";

/// `clisso` with HOME pointed at `home` and no ambient overrides.
pub fn clisso_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("clisso").unwrap();
    cmd.env("HOME", home.path());
    cmd.env_remove("CLISSO_CONFIG");
    cmd.env_remove("CLISSO_LOG");
    cmd
}

/// Write `content` to `~/.clisso.yaml` inside `home`.
pub fn write_config(home: &TempDir, content: &str) {
    fs::write(home.path().join(".clisso.yaml"), content).unwrap();
}
