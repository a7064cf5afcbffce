//! UI languages and their label tables.

use serde::{Deserialize, Serialize};

/// Bilingual selector label, shown the same in every language.
pub const LANGUAGE_LABEL: &str = "Language / 語言：";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Zh, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "zh" => Some(Self::Zh),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// Label of this language's option in the selector.
    pub fn option_label(self) -> &'static str {
        match self {
            Self::Zh => "中文",
            Self::En => "English",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Zh => Self::En,
            Self::En => Self::Zh,
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Self::Zh => &ZH,
            Self::En => &EN,
        }
    }
}

/// Every user-facing label for one language.
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub select_label: &'static str,
    pub select_placeholder: &'static str,
    pub info_title: &'static str,
    pub todo_title: &'static str,
    pub add_todo_placeholder: &'static str,
    pub add_button: &'static str,
    pub joke_title: &'static str,
    pub joke_button: &'static str,

    // terminal-only
    pub no_selection_hint: &'static str,
    pub empty_todos_hint: &'static str,
    pub no_joke_hint: &'static str,
    pub fetching: &'static str,
    pub filter_placeholder: &'static str,
    pub no_matches: &'static str,
    pub copied: &'static str,
    pub save_failed: &'static str,
    pub help_title: &'static str,
    /// (keys, description) rows for the help overlay.
    pub help_rows: &'static [(&'static str, &'static str)],
    pub keys_normal: &'static str,
    pub keys_filter: &'static str,
    pub keys_insert: &'static str,
}

static ZH: Strings = Strings {
    title: "拉麵搜尋器",
    select_label: "選擇一家拉麵店：",
    select_placeholder: "請選擇",
    info_title: "拉麵店資訊：",
    todo_title: "待辦事項",
    add_todo_placeholder: "新增待辦事項...",
    add_button: "新增",
    joke_title: "笑話生成",
    joke_button: "生成笑話",

    no_selection_hint: "尚未選擇拉麵店",
    empty_todos_hint: "目前沒有待辦事項",
    no_joke_hint: "按 g 生成笑話",
    fetching: "載入中…",
    filter_placeholder: "店名或地址…",
    no_matches: "沒有符合的拉麵店",
    copied: "已複製到剪貼簿",
    save_failed: "無法儲存偏好設定",
    help_title: " 鍵盤快捷鍵",
    help_rows: &[
        ("l", "切換語言（中文 / English）"),
        ("↑ / ↓  或  j / k", "移動游標"),
        ("enter", "選擇拉麵店 / 新增待辦 / 生成笑話"),
        ("/", "篩選拉麵店"),
        ("x", "清除已選擇的拉麵店"),
        ("a  或  i", "輸入待辦事項"),
        ("d  或  delete", "刪除待辦事項"),
        ("g", "生成笑話"),
        ("y", "複製地址或笑話"),
        ("tab / 1-4", "切換窗格"),
        ("?", "顯示 / 隱藏說明"),
        ("q", "離開"),
    ],
    keys_normal: " ↑↓/jk 移動  enter 選擇  l 語言  / 篩選  a 新增  d 刪除  g 笑話  tab 窗格  ? 說明  q 離開",
    keys_filter: " 輸入以篩選  ↑↓ 移動  enter 保留  esc 清除/關閉",
    keys_insert: " 輸入待辦事項  enter 新增  esc 返回",
};

static EN: Strings = Strings {
    title: "Ramen Shop Finder",
    select_label: "Select a ramen shop:",
    select_placeholder: "Please select",
    info_title: "Ramen Shop Info:",
    todo_title: "To-Do List",
    add_todo_placeholder: "Add a new task...",
    add_button: "Add",
    joke_title: "Joke Generator",
    joke_button: "Generate Joke",

    no_selection_hint: "No shop selected",
    empty_todos_hint: "Nothing to do yet",
    no_joke_hint: "Press g for a joke",
    fetching: "fetching…",
    filter_placeholder: "name or address…",
    no_matches: "No matching shops",
    copied: "Copied to clipboard",
    save_failed: "Could not save preferences",
    help_title: " keyboard shortcuts",
    help_rows: &[
        ("l", "switch language (中文 / English)"),
        ("↑ / ↓  or  j / k", "move cursor"),
        ("enter", "select shop / add task / fetch joke"),
        ("/", "filter shops"),
        ("x", "clear selected shop"),
        ("a  or  i", "type a new task"),
        ("d  or  delete", "delete task"),
        ("g", "fetch a joke"),
        ("y", "copy address or joke"),
        ("tab / 1-4", "focus pane"),
        ("?", "toggle help"),
        ("q", "quit"),
    ],
    keys_normal: " ↑↓/jk move  enter select  l language  / filter  a add  d delete  g joke  tab panes  ? help  q quit",
    keys_filter: " type to filter  ↑↓ move  enter keep  esc clear/close",
    keys_insert: " type a task  enter add  esc back",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::from_code("ZH"), None);
    }

    #[test]
    fn test_default_is_chinese() {
        assert_eq!(Language::default(), Language::Zh);
        assert_eq!(Language::default().strings().title, "拉麵搜尋器");
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
        let lang: Language = serde_json::from_str("\"zh\"").unwrap();
        assert_eq!(lang, Language::Zh);
    }

    #[test]
    fn test_next_cycles_both_options() {
        assert_eq!(Language::Zh.next(), Language::En);
        assert_eq!(Language::En.next(), Language::Zh);
    }
}
