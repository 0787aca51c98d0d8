//! Clone URLs and the public JSON projection of a repository.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::repository::types::Repository;

/// Derives clone URLs from configuration. Pure string formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrls {
    host: String,
    readonly_host: Option<String>,
    uid: String,
    ssh: bool,
    ssh_port: Option<String>,
}

impl RemoteUrls {
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.host.clone(),
            readonly_host: config.readonly_host.clone(),
            uid: config.uid.clone(),
            ssh: config.git.ssh.enabled,
            ssh_port: config.git.ssh.port.clone(),
        }
    }

    fn port_suffix(&self) -> String {
        match &self.ssh_port {
            Some(port) if !port.is_empty() => format!(":{}", port),
            _ => String::new(),
        }
    }

    /// `git://<host>/<name>.git`, or the ssh form when ssh is enabled.
    /// Uses the read-only host when one is configured.
    pub fn read_only(&self, name: &str) -> String {
        let host = self.readonly_host.as_deref().unwrap_or(&self.host);
        if self.ssh {
            format!("ssh://{}@{}{}/{}.git", self.uid, host, self.port_suffix(), name)
        } else {
            format!("git://{}/{}.git", host, name)
        }
    }

    /// `<uid>@<host>:<name>.git`, or the ssh form when ssh is enabled.
    pub fn read_write(&self, name: &str) -> String {
        if self.ssh {
            format!(
                "ssh://{}@{}{}/{}.git",
                self.uid,
                self.host,
                self.port_suffix(),
                name
            )
        } else {
            format!("{}@{}:{}.git", self.uid, self.host, name)
        }
    }

    /// Project a record for API consumers. The user list is left out.
    pub fn view(&self, repository: &Repository) -> RepositoryView {
        RepositoryView {
            name: repository.name.clone(),
            public: repository.is_public,
            ssh_url: self.read_write(&repository.name),
            git_url: self.read_only(&repository.name),
        }
    }
}

/// JSON shape of a repository as seen by API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryView {
    pub name: String,
    pub public: bool,
    pub ssh_url: String,
    pub git_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(config: Config) -> RemoteUrls {
        RemoteUrls::from_config(&config)
    }

    #[test]
    fn test_read_only_url() {
        let u = urls(Config::new("git.example.com"));
        assert_eq!(u.read_only("lol"), "git://git.example.com/lol.git");
    }

    #[test]
    fn test_read_only_url_with_ssh() {
        let u = urls(Config::new("git.example.com").ssh(None));
        assert_eq!(u.read_only("lol"), "ssh://git@git.example.com/lol.git");
    }

    #[test]
    fn test_read_only_url_with_ssh_and_port() {
        let u = urls(Config::new("git.example.com").ssh(Some("49022")));
        assert_eq!(
            u.read_only("lol"),
            "ssh://git@git.example.com:49022/lol.git"
        );
    }

    #[test]
    fn test_read_only_url_with_read_only_host() {
        let u = urls(Config::new("git.example.com").readonly_host("something-private"));
        assert_eq!(u.read_only("lol"), "git://something-private/lol.git");
    }

    #[test]
    fn test_read_write_url() {
        let u = urls(Config::new("git.example.com"));
        assert_eq!(u.read_write("lol"), "git@git.example.com:lol.git");
    }

    #[test]
    fn test_read_write_url_with_ssh() {
        let u = urls(Config::new("git.example.com").uid("hosting").ssh(None));
        assert_eq!(
            u.read_write("lol"),
            "ssh://hosting@git.example.com/lol.git"
        );
    }

    #[test]
    fn test_read_write_url_with_ssh_and_port() {
        let u = urls(Config::new("git.example.com").uid("hosting").ssh(Some("49022")));
        assert_eq!(
            u.read_write("lol"),
            "ssh://hosting@git.example.com:49022/lol.git"
        );
    }

    #[test]
    fn test_read_write_url_uses_configured_uid() {
        let u = urls(Config::new("git.example.com").uid("test"));
        assert_eq!(u.read_write("f#"), "test@git.example.com:f#.git");
    }

    #[test]
    fn test_view_json() {
        let u = urls(Config::new("h"));
        let repo = Repository::new("somerepo", vec![], false);
        let json = serde_json::to_value(u.view(&repo)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "somerepo",
                "public": false,
                "ssh_url": "git@h:somerepo.git",
                "git_url": "git://h/somerepo.git",
            })
        );
        assert!(json.get("users").is_none());
    }
}
