//! # 格点描述文件
//!
//! 杂质/浴（VLA）模型的 JSON 格点文件：生成、序列化与读取。
//!
//! ## 文件结构
//! ```text
//! {
//!     "sites": {
//!         "0": { "LocalMu": 2.0, "U": 4.0, "hopping": [...], "type": "s" },
//!         "1": { ... }
//!     }
//! }
//! ```
//! 所有层级的键按字典序排列，缩进 4 个空格。
//!
//! ## 依赖关系
//! - 被 `commands/lattice.rs`, `commands/gf.rs` 使用
//! - 被 `ed/hamiltonian.rs` 用于构造哈密顿量
//! - 使用 `serde` / `serde_json`

use crate::error::{EdkitError, Result};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// 当前唯一支持的轨道类型
pub const S_ORBITAL: &str = "s";

/// 跃迁项 `value · c†_{from} c_{to}`
///
/// 字段声明顺序即为输出顺序（字典序）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoppingTerm {
    pub orbital_from: u32,
    pub orbital_to: u32,
    pub to: String,
    pub value: f64,
}

impl HoppingTerm {
    /// s 轨道之间的跃迁
    pub fn s_wave(to: impl Into<String>, value: f64) -> Self {
        Self {
            orbital_from: 0,
            orbital_to: 0,
            to: to.into(),
            value,
        }
    }
}

/// 单个格点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeSite {
    /// 局域化学势
    #[serde(rename = "LocalMu", default)]
    pub local_mu: f64,
    /// 在位 Hubbard 相互作用
    #[serde(rename = "U", default)]
    pub u: f64,
    /// 跃迁列表
    #[serde(default)]
    pub hopping: Vec<HoppingTerm>,
    /// 轨道类型
    #[serde(rename = "type", default = "default_orbital")]
    pub orbital: String,
}

fn default_orbital() -> String {
    S_ORBITAL.to_string()
}

/// 格点文件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatticeFile {
    /// 按标签排序的格点
    pub sites: BTreeMap<String, LatticeSite>,
}

impl LatticeFile {
    /// 格点标签（字典序）
    pub fn site_labels(&self) -> Vec<String> {
        self.sites.keys().cloned().collect()
    }

    /// 浴格点数量（除关联格点 "0" 外的所有格点）
    pub fn bath_count(&self) -> usize {
        self.sites.len().saturating_sub(1)
    }

    /// 检查格点文件的自洽性
    pub fn validate(&self) -> Result<()> {
        if self.sites.is_empty() {
            return Err(EdkitError::InvalidLattice("no sites defined".to_string()));
        }

        for (label, site) in &self.sites {
            if site.orbital != S_ORBITAL {
                return Err(EdkitError::UnsupportedFormat(format!(
                    "orbital type '{}' on site '{}' (only 's' is supported)",
                    site.orbital, label
                )));
            }

            for hop in &site.hopping {
                if !self.sites.contains_key(&hop.to) {
                    return Err(EdkitError::InvalidLattice(format!(
                        "site '{}' hops to unknown site '{}'",
                        label, hop.to
                    )));
                }
                if hop.orbital_from != 0 || hop.orbital_to != 0 {
                    return Err(EdkitError::UnsupportedFormat(format!(
                        "orbital index {} -> {} on site '{}' (s orbitals have index 0)",
                        hop.orbital_from, hop.orbital_to, label
                    )));
                }
            }
        }

        Ok(())
    }
}

/// 生成 VLA 格点：1 个关联格点 + `hoppings.len()` 个浴格点
///
/// 关联格点 "0" 处于半满（`LocalMu = U/2`），浴格点无相互作用，
/// 每个浴格点 `i` 通过 `hoppings[i-1]` 与关联格点相连。
pub fn vla_lattice(u: f64, hoppings: &[f64]) -> LatticeFile {
    let mut sites = BTreeMap::new();

    let master_hopping = hoppings
        .iter()
        .enumerate()
        .map(|(j, &t)| HoppingTerm::s_wave((j + 1).to_string(), t))
        .collect();

    sites.insert(
        "0".to_string(),
        LatticeSite {
            local_mu: u / 2.0,
            u,
            hopping: master_hopping,
            orbital: S_ORBITAL.to_string(),
        },
    );

    for (j, &t) in hoppings.iter().enumerate() {
        sites.insert(
            (j + 1).to_string(),
            LatticeSite {
                local_mu: 0.0,
                u: 0.0,
                hopping: vec![HoppingTerm::s_wave("0", t)],
                orbital: S_ORBITAL.to_string(),
            },
        );
    }

    LatticeFile { sites }
}

/// 序列化为 JSON（排序键，4 空格缩进）
pub fn to_json_string(lattice: &LatticeFile) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    lattice.serialize(&mut ser)?;

    String::from_utf8(buf).map_err(|e| EdkitError::Other(e.to_string()))
}

/// 写入格点文件
pub fn write_lattice_file(lattice: &LatticeFile, path: &Path) -> Result<()> {
    let content = to_json_string(lattice)?;

    fs::write(path, content).map_err(|e| EdkitError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 读取并校验格点文件
pub fn parse_lattice_file(path: &Path) -> Result<LatticeFile> {
    let content = fs::read_to_string(path).map_err(|e| EdkitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_lattice_content(&content, &path.display().to_string())
}

/// 从字符串解析格点文件
pub fn parse_lattice_content(content: &str, path: &str) -> Result<LatticeFile> {
    let lattice: LatticeFile =
        serde_json::from_str(content).map_err(|e| EdkitError::ParseError {
            format: "lattice JSON".to_string(),
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    lattice.validate()?;
    Ok(lattice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vla_lattice_layout() {
        let lattice = vla_lattice(4.0, &[0.5, 1.0]);
        assert_eq!(lattice.site_labels(), vec!["0", "1", "2"]);
        assert_eq!(lattice.bath_count(), 2);

        let master = &lattice.sites["0"];
        assert!((master.u - 4.0).abs() < 1e-12);
        assert!((master.local_mu - 2.0).abs() < 1e-12);
        assert_eq!(master.hopping.len(), 2);
        assert_eq!(master.hopping[1].to, "2");
        assert!((master.hopping[1].value - 1.0).abs() < 1e-12);

        let bath = &lattice.sites["2"];
        assert_eq!(bath.u, 0.0);
        assert_eq!(bath.hopping, vec![HoppingTerm::s_wave("0", 1.0)]);
    }

    #[test]
    fn test_json_sorted_keys_and_indent() {
        let json = to_json_string(&vla_lattice(4.0, &[0.5])).unwrap();

        let expected = r#"{
    "sites": {
        "0": {
            "LocalMu": 2.0,
            "U": 4.0,
            "hopping": [
                {
                    "orbital_from": 0,
                    "orbital_to": 0,
                    "to": "1",
                    "value": 0.5
                }
            ],
            "type": "s"
        },
        "1": {
            "LocalMu": 0.0,
            "U": 0.0,
            "hopping": [
                {
                    "orbital_from": 0,
                    "orbital_to": 0,
                    "to": "0",
                    "value": 0.5
                }
            ],
            "type": "s"
        }
    }
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_site_labels_string_order() {
        let hoppings = vec![0.1; 10];
        let lattice = vla_lattice(1.0, &hoppings);
        let labels = lattice.site_labels();
        // "10" 排在 "2" 之前
        assert_eq!(labels[1], "1");
        assert_eq!(labels[2], "10");
        assert_eq!(labels[3], "2");
    }

    #[test]
    fn test_parse_roundtrip_and_defaults() {
        let content = r#"{"sites": {"0": {"U": 1.0, "hopping": [{"to": "1", "value": -1.0, "orbital_from": 0, "orbital_to": 0}]},
                                     "1": {"hopping": [{"to": "0", "value": -1.0, "orbital_from": 0, "orbital_to": 0}]}}}"#;
        let lattice = parse_lattice_content(content, "inline").unwrap();
        assert_eq!(lattice.sites["0"].local_mu, 0.0);
        assert_eq!(lattice.sites["1"].orbital, "s");
    }

    #[test]
    fn test_parse_rejects_unknown_target() {
        let content = r#"{"sites": {"0": {"hopping": [{"to": "7", "value": 1.0, "orbital_from": 0, "orbital_to": 0}]}}}"#;
        let err = parse_lattice_content(content, "inline").unwrap_err();
        assert!(matches!(err, EdkitError::InvalidLattice(_)));
    }

    #[test]
    fn test_parse_rejects_p_orbital() {
        let content = r#"{"sites": {"0": {"type": "p"}}}"#;
        let err = parse_lattice_content(content, "inline").unwrap_err();
        assert!(matches!(err, EdkitError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LatticeTest.json");
        let lattice = vla_lattice(4.0, &[0.5, 1.0, 0.3, 0.4]);

        write_lattice_file(&lattice, &path).unwrap();
        let read_back = parse_lattice_file(&path).unwrap();
        assert_eq!(read_back, lattice);
    }
}
