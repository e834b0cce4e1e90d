//! # 单粒子模式索引
//!
//! 模式 = (格点标签, 自旋)。`IndexSet` 固定模式编号，编号即 Fock 态中的比特位。
//!
//! ## 依赖关系
//! - 被 `ed/hamiltonian.rs`, `ed/chi3.rs`, `commands/` 使用

use crate::error::{EdkitError, Result};

use std::fmt;
use std::str::FromStr;

/// 自旋
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Spin {
    Up,
    Down,
}

impl Spin {
    pub const BOTH: [Spin; 2] = [Spin::Up, Spin::Down];
}

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spin::Up => write!(f, "up"),
            Spin::Down => write!(f, "dn"),
        }
    }
}

impl FromStr for Spin {
    type Err = EdkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" | "+" => Ok(Spin::Up),
            "dn" | "down" | "d" | "-" => Ok(Spin::Down),
            other => Err(EdkitError::InvalidArgument(format!(
                "Invalid spin '{}' (expected up/dn)",
                other
            ))),
        }
    }
}

/// 单粒子模式
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModeIndex {
    pub site: String,
    pub spin: Spin,
}

impl ModeIndex {
    pub fn new(site: impl Into<String>, spin: Spin) -> Self {
        Self {
            site: site.into(),
            spin,
        }
    }
}

impl fmt::Display for ModeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.site, self.spin)
    }
}

/// 解析 `SITE:SPIN`，例如 `0:up` 或 `2,0:dn`
impl FromStr for ModeIndex {
    type Err = EdkitError;

    fn from_str(s: &str) -> Result<Self> {
        let (site, spin) = s.rsplit_once(':').ok_or_else(|| {
            EdkitError::InvalidArgument(format!("Invalid index '{}' (expected SITE:SPIN)", s))
        })?;

        let site = site.trim();
        if site.is_empty() {
            return Err(EdkitError::InvalidArgument(format!(
                "Invalid index '{}': empty site label",
                s
            )));
        }

        Ok(ModeIndex::new(site, spin.parse()?))
    }
}

/// 有序模式集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSet {
    modes: Vec<ModeIndex>,
}

impl IndexSet {
    /// 先全部自旋向上，再全部自旋向下
    pub fn from_sites<S: AsRef<str>>(sites: &[S]) -> Self {
        let modes = Spin::BOTH
            .iter()
            .flat_map(|&spin| sites.iter().map(move |s| ModeIndex::new(s.as_ref(), spin)))
            .collect();
        Self { modes }
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// 某一自旋的所有模式
    pub fn with_spin(&self, spin: Spin) -> Vec<ModeIndex> {
        self.modes
            .iter()
            .filter(|m| m.spin == spin)
            .cloned()
            .collect()
    }

    pub fn position(&self, mode: &ModeIndex) -> Option<usize> {
        self.modes.iter().position(|m| m == mode)
    }

    /// 查找模式编号，找不到时返回错误
    pub fn require(&self, mode: &ModeIndex) -> Result<usize> {
        self.position(mode)
            .ok_or_else(|| EdkitError::UnknownIndex(mode.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_index() {
        let idx: ModeIndex = "2,0:dn".parse().unwrap();
        assert_eq!(idx, ModeIndex::new("2,0", Spin::Down));
        assert_eq!(idx.to_string(), "2,0:dn");

        let idx: ModeIndex = "0:UP".parse().unwrap();
        assert_eq!(idx.spin, Spin::Up);

        assert!("0".parse::<ModeIndex>().is_err());
        assert!(":up".parse::<ModeIndex>().is_err());
        assert!("0:left".parse::<ModeIndex>().is_err());
    }

    #[test]
    fn test_index_set_order() {
        let set = IndexSet::from_sites(&["a", "b"]);
        assert_eq!(set.len(), 4);
        assert_eq!(set.position(&ModeIndex::new("b", Spin::Up)), Some(1));
        assert_eq!(set.position(&ModeIndex::new("a", Spin::Down)), Some(2));
        assert!(set.require(&ModeIndex::new("c", Spin::Up)).is_err());
        assert_eq!(set.with_spin(Spin::Down).len(), 2);
    }
}
