use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FednodeError;

/// Backend project/namespace identifier for every compose invocation.
pub const PROJECT_NAME: &str = "federatednode";

const REPO_BASE_HTTPS: &str = "https://github.com/CounterpartyXCP";
const REPO_BASE_SSH: &str = "git@github.com:CounterpartyXCP";

/// A deployment shape. Profiles form a strict superset chain:
/// `full` ⊇ `counterblock` ⊇ `base`, for both repositories and ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Base,
    Counterblock,
    Full,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Base, Profile::Counterblock, Profile::Full];

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Base => "base",
            Profile::Counterblock => "counterblock",
            Profile::Full => "full",
        }
    }

    /// The profile this one extends, if any.
    fn parent(self) -> Option<Profile> {
        match self {
            Profile::Base => None,
            Profile::Counterblock => Some(Profile::Base),
            Profile::Full => Some(Profile::Counterblock),
        }
    }

    fn own_repos(self) -> &'static [Repo] {
        match self {
            Profile::Base => &[Repo::CounterpartyLib, Repo::CounterpartyCli],
            Profile::Counterblock => &[Repo::Counterblock],
            Profile::Full => &[Repo::Counterwallet, Repo::ArmoryUtxsvr],
        }
    }

    fn own_ports(self) -> &'static [u16] {
        match self {
            Profile::Base => &[8332, 18332, 4000, 14000],
            Profile::Counterblock => &[4100, 14100],
            Profile::Full => &[80, 443],
        }
    }

    /// Repositories required by this profile, in clone order, without duplicates.
    pub fn repos(self) -> Vec<Repo> {
        let mut repos = self.parent().map(Profile::repos).unwrap_or_default();
        for repo in self.own_repos() {
            if !repos.contains(repo) {
                repos.push(*repo);
            }
        }
        repos
    }

    /// Host TCP ports this profile's containers bind.
    pub fn reserved_ports(self) -> Vec<u16> {
        let mut ports = self.parent().map(Profile::reserved_ports).unwrap_or_default();
        for port in self.own_ports() {
            if !ports.contains(port) {
                ports.push(*port);
            }
        }
        ports
    }

    /// File name of the compose descriptor, relative to the deployment root.
    pub fn descriptor_file(self) -> String {
        format!("docker-compose.{}.yml", self.as_str())
    }

    /// Updatable services whose every checkout belongs to this profile.
    pub fn updatable_services(self) -> Vec<LogicalService> {
        let repos = self.repos();
        LogicalService::UPDATABLE
            .into_iter()
            .filter(|svc| svc.family().checkouts().iter().all(|r| repos.contains(r)))
            .collect()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = FednodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| FednodeError::UnknownProfile {
                name: s.to_string(),
                suggestion: closest(s, Profile::ALL.iter().map(|p| p.as_str())),
            })
    }
}

/// Git branch a deployment is installed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Master,
    Develop,
}

impl Branch {
    pub const ALL: [Branch; 2] = [Branch::Master, Branch::Develop];

    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Master => "master",
            Branch::Develop => "develop",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = FednodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| FednodeError::UnknownBranch {
                name: s.to_string(),
                suggestion: closest(s, Branch::ALL.iter().map(|b| b.as_str())),
            })
    }
}

/// A source repository checked out under `<root>/src/<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repo {
    CounterpartyLib,
    CounterpartyCli,
    Counterblock,
    Counterwallet,
    ArmoryUtxsvr,
}

impl Repo {
    pub fn name(self) -> &'static str {
        match self {
            Repo::CounterpartyLib => "counterparty-lib",
            Repo::CounterpartyCli => "counterparty-cli",
            Repo::Counterblock => "counterblock",
            Repo::Counterwallet => "counterwallet",
            Repo::ArmoryUtxsvr => "armory-utxsvr",
        }
    }

    pub fn remote_url(self, use_ssh: bool) -> String {
        if use_ssh {
            format!("{}/{}.git", REPO_BASE_SSH, self.name())
        } else {
            format!("{}/{}.git", REPO_BASE_HTTPS, self.name())
        }
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of logical services that share the same checkout(s) for sync purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoFamily {
    Counterparty,
    Counterblock,
    Counterwallet,
    ArmoryUtxsvr,
}

impl RepoFamily {
    /// Checkouts that move together, in pull order.
    pub fn checkouts(self) -> &'static [Repo] {
        match self {
            RepoFamily::Counterparty => &[Repo::CounterpartyLib, Repo::CounterpartyCli],
            RepoFamily::Counterblock => &[Repo::Counterblock],
            RepoFamily::Counterwallet => &[Repo::Counterwallet],
            RepoFamily::ArmoryUtxsvr => &[Repo::ArmoryUtxsvr],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RepoFamily::Counterparty => "counterparty",
            RepoFamily::Counterblock => "counterblock",
            RepoFamily::Counterwallet => "counterwallet",
            RepoFamily::ArmoryUtxsvr => "armory-utxsvr",
        }
    }
}

const TESTNET_SUFFIX: &str = "-testnet";

/// An operator-addressable service whose source code `fednode` manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalService {
    Counterparty,
    CounterpartyTestnet,
    Counterblock,
    CounterblockTestnet,
    Counterwallet,
    ArmoryUtxsvr,
    ArmoryUtxsvrTestnet,
}

/// Directive appended to a `run` invocation to kick off a reparse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReparseDirective {
    pub key: &'static str,
    pub value: &'static str,
}

impl LogicalService {
    /// Every service `update` accepts, in default processing order.
    pub const UPDATABLE: [LogicalService; 7] = [
        LogicalService::Counterparty,
        LogicalService::CounterpartyTestnet,
        LogicalService::Counterblock,
        LogicalService::CounterblockTestnet,
        LogicalService::Counterwallet,
        LogicalService::ArmoryUtxsvr,
        LogicalService::ArmoryUtxsvrTestnet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LogicalService::Counterparty => "counterparty",
            LogicalService::CounterpartyTestnet => "counterparty-testnet",
            LogicalService::Counterblock => "counterblock",
            LogicalService::CounterblockTestnet => "counterblock-testnet",
            LogicalService::Counterwallet => "counterwallet",
            LogicalService::ArmoryUtxsvr => "armory-utxsvr",
            LogicalService::ArmoryUtxsvrTestnet => "armory-utxsvr-testnet",
        }
    }

    /// Canonical family: the service name with its testnet marker stripped.
    pub fn family(self) -> RepoFamily {
        let base = self.name().strip_suffix(TESTNET_SUFFIX).unwrap_or(self.name());
        match base {
            "counterparty" => RepoFamily::Counterparty,
            "counterblock" => RepoFamily::Counterblock,
            "counterwallet" => RepoFamily::Counterwallet,
            _ => RepoFamily::ArmoryUtxsvr,
        }
    }

    /// How to ask this service to reparse, if it supports it at all.
    pub fn reparse_directive(self) -> Option<ReparseDirective> {
        match self {
            LogicalService::Counterparty | LogicalService::CounterpartyTestnet => {
                Some(ReparseDirective {
                    key: "COMMAND",
                    value: "reparse",
                })
            }
            LogicalService::Counterblock | LogicalService::CounterblockTestnet => {
                Some(ReparseDirective {
                    key: "EXTRA_PARAMS",
                    value: "--reparse",
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for LogicalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogicalService {
    type Err = FednodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalService::UPDATABLE
            .into_iter()
            .find(|svc| svc.name() == s)
            .ok_or_else(|| FednodeError::UnknownService {
                name: s.to_string(),
                suggestion: closest(s, LogicalService::UPDATABLE.iter().map(|svc| svc.name())),
            })
    }
}

/// Minimum Jaro-Winkler score to offer a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Find the closest candidate to `name`, if any is similar enough.
pub fn closest<'a>(name: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let score = strsim::jaro_winkler(name, candidate);
        if score >= SUGGESTION_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best.map(|(c, _)| c.to_string())
}
