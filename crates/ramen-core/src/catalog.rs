//! The fixed set of ramen shops.

use crate::i18n::Language;

/// A pair of strings, one per supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localized {
    pub zh: &'static str,
    pub en: &'static str,
}

impl Localized {
    pub fn get(&self, lang: Language) -> &'static str {
        match lang {
            Language::Zh => self.zh,
            Language::En => self.en,
        }
    }

    fn contains_folded(&self, needle: &str) -> bool {
        self.zh.to_lowercase().contains(needle) || self.en.to_lowercase().contains(needle)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ShopRecord {
    /// Stable, language-independent identifier; this is what gets persisted.
    pub key: &'static str,
    pub name: Localized,
    pub address: Localized,
}

impl ShopRecord {
    pub fn display_name(&self, lang: Language) -> &'static str {
        self.name.get(lang)
    }

    pub fn display_address(&self, lang: Language) -> &'static str {
        self.address.get(lang)
    }

    /// Case-insensitive match on name or address in either language.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        q.is_empty() || self.name.contains_folded(&q) || self.address.contains_folded(&q)
    }
}

pub static CATALOG: [ShopRecord; 5] = [
    ShopRecord {
        key: "ichiran",
        name: Localized {
            zh: "一蘭拉麵",
            en: "Ichiran Ramen",
        },
        address: Localized {
            zh: "台北市110台北市信義區松仁路97號",
            en: "97 Songren Rd, Xinyi District, Taipei",
        },
    },
    ShopRecord {
        key: "ippudo",
        name: Localized {
            zh: "一風堂拉麵",
            en: "Ippudo Ramen",
        },
        address: Localized {
            zh: "台北市中山區中山北路一段85號",
            en: "85 Zhongshan North Rd, Zhongshan District, Taipei",
        },
    },
    ShopRecord {
        key: "musashi",
        name: Localized {
            zh: "武藏拉麵",
            en: "Musashi Ramen",
        },
        address: Localized {
            zh: "台北市中正區忠孝西路一段36號B1",
            en: "B1, No. 36, Sec. 1, Zhongxiao W Rd, Zhongzheng District, Taipei",
        },
    },
    ShopRecord {
        key: "nagi",
        name: Localized {
            zh: "拉麵凪",
            en: "Ramen Nagi",
        },
        address: Localized {
            zh: "台北市大安區大安路一段75巷5號",
            en: "No. 5, Lane 75, Sec. 1, Da'an Rd, Da'an District, Taipei",
        },
    },
    ShopRecord {
        key: "santouka",
        name: Localized {
            zh: "山頭火拉麵",
            en: "Santouka Ramen",
        },
        address: Localized {
            zh: "台北市大同區承德路一段1號B3",
            en: "B3, No. 1, Sec. 1, Chengde Rd, Datong District, Taipei",
        },
    },
];

pub fn all() -> &'static [ShopRecord] {
    &CATALOG
}

pub fn find_by_key(key: &str) -> Option<&'static ShopRecord> {
    CATALOG.iter().find(|shop| shop.key == key)
}

/// First shop whose name in `lang` is exactly `display_name`.
pub fn find_by_name(lang: Language, display_name: &str) -> Option<&'static ShopRecord> {
    CATALOG
        .iter()
        .find(|shop| shop.display_name(lang) == display_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = all().iter().map(|s| s.key).collect();
        assert_eq!(keys.len(), all().len());
    }

    #[test]
    fn test_find_by_name_is_language_scoped() {
        let shop = find_by_name(Language::En, "Ichiran Ramen").unwrap();
        assert_eq!(shop.key, "ichiran");
        assert!(find_by_name(Language::Zh, "Ichiran Ramen").is_none());
        assert_eq!(find_by_name(Language::Zh, "一蘭拉麵").unwrap().key, "ichiran");
    }

    #[test]
    fn test_find_by_key() {
        assert_eq!(
            find_by_key("nagi").unwrap().display_name(Language::En),
            "Ramen Nagi"
        );
        assert!(find_by_key("Ramen Nagi").is_none());
    }

    #[test]
    fn test_matches_either_language_and_address() {
        let shop = find_by_key("santouka").unwrap();
        assert!(shop.matches("santouka"));
        assert!(shop.matches("山頭火"));
        assert!(shop.matches("chengde"));
        assert!(shop.matches("  "));
        assert!(!shop.matches("ichiran"));
    }
}
