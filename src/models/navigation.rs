//! 控制台导航状态
//!
//! 当前标签页、搜索词、打开的抽屉与"显示已归档"开关由查询参数表示。
//! 用户操作与外部导航都通过 `reconcile` 合并到状态中，不做双向绑定。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::directory::entities::EntityId;
use super::imports::entities::ImportTarget;

// 控制台标签页
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/navigation.ts")]
pub enum ConsoleTab {
    #[default]
    Teachers,
    Students,
    Courses,
    Sections,
    Exams,
    Institution,
    Logs,
}

impl ConsoleTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleTab::Teachers => "teachers",
            ConsoleTab::Students => "students",
            ConsoleTab::Courses => "courses",
            ConsoleTab::Sections => "sections",
            ConsoleTab::Exams => "exams",
            ConsoleTab::Institution => "institution",
            ConsoleTab::Logs => "logs",
        }
    }
}

impl std::str::FromStr for ConsoleTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teachers" => Ok(ConsoleTab::Teachers),
            "students" => Ok(ConsoleTab::Students),
            "courses" => Ok(ConsoleTab::Courses),
            "sections" => Ok(ConsoleTab::Sections),
            "exams" => Ok(ConsoleTab::Exams),
            "institution" => Ok(ConsoleTab::Institution),
            "logs" => Ok(ConsoleTab::Logs),
            _ => Err(format!("Invalid tab: {s}")),
        }
    }
}

// 打开的抽屉，参数形如 "person:ID"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/navigation.ts")]
pub enum Drawer {
    Person(EntityId),
    Course(EntityId),
    Section(EntityId),
    Import(ImportTarget),
}

impl Drawer {
    pub fn to_param(&self) -> String {
        match self {
            Drawer::Person(id) => format!("person:{id}"),
            Drawer::Course(id) => format!("course:{id}"),
            Drawer::Section(id) => format!("section:{id}"),
            Drawer::Import(target) => format!("import:{target}"),
        }
    }
}

impl std::str::FromStr for Drawer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| format!("Invalid drawer: {s}"))?;
        let id = id.trim();
        if id.is_empty() {
            return Err(format!("Drawer {kind} needs an id"));
        }
        match kind {
            "person" => Ok(Drawer::Person(id.to_string())),
            "course" => Ok(Drawer::Course(id.to_string())),
            "section" => Ok(Drawer::Section(id.to_string())),
            "import" => id.parse().map(Drawer::Import),
            _ => Err(format!("Invalid drawer kind: {kind}")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/navigation.ts")]
pub struct NavigationState {
    pub tab: ConsoleTab,
    pub search: String,
    pub drawer: Option<Drawer>,
    pub show_archived: bool,
}

/// 查询参数形式的导航状态。缺省字段表示"保持不变"，空字符串表示清除
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/navigation.ts")]
pub struct NavParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<String>,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 把参数合并进当前状态，返回新状态
///
/// - 无法识别的标签页或开关值保持原值
/// - 切换标签页时，若参数未指定抽屉则关闭抽屉
/// - 无法解析的抽屉参数关闭抽屉
pub fn reconcile(state: &NavigationState, params: &NavParams) -> NavigationState {
    let mut next = state.clone();

    if let Some(tab) = params.tab.as_deref().and_then(|t| t.parse().ok()) {
        next.tab = tab;
    }

    if let Some(search) = &params.search {
        next.search = search.trim().to_string();
    }

    match params.drawer.as_deref() {
        Some(raw) if raw.trim().is_empty() => next.drawer = None,
        Some(raw) => next.drawer = raw.parse().ok(),
        None if next.tab != state.tab => next.drawer = None,
        None => {}
    }

    if let Some(flag) = params.archived.as_deref().and_then(parse_flag) {
        next.show_archived = flag;
    }

    next
}

impl NavigationState {
    /// 规范化的查询参数
    pub fn to_params(&self) -> NavParams {
        NavParams {
            tab: Some(self.tab.as_str().to_string()),
            search: Some(self.search.clone()),
            drawer: Some(self.drawer.as_ref().map(Drawer::to_param).unwrap_or_default()),
            archived: Some(if self.show_archived { "1" } else { "0" }.to_string()),
        }
    }

    /// 大小写不敏感地匹配搜索词；搜索词为空时全部匹配
    pub fn matches_search<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        fields
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(tab: Option<&str>, search: Option<&str>, drawer: Option<&str>, archived: Option<&str>) -> NavParams {
        NavParams {
            tab: tab.map(str::to_string),
            search: search.map(str::to_string),
            drawer: drawer.map(str::to_string),
            archived: archived.map(str::to_string),
        }
    }

    #[test]
    fn test_missing_params_keep_state() {
        let state = NavigationState {
            tab: ConsoleTab::Courses,
            search: "math".into(),
            drawer: Some(Drawer::Course("c1".into())),
            show_archived: true,
        };
        assert_eq!(reconcile(&state, &NavParams::default()), state);
    }

    #[test]
    fn test_tab_change_closes_drawer() {
        let state = NavigationState {
            drawer: Some(Drawer::Person("u1".into())),
            ..Default::default()
        };
        let next = reconcile(&state, &params(Some("students"), None, None, None));
        assert_eq!(next.tab, ConsoleTab::Students);
        assert_eq!(next.drawer, None);

        let next = reconcile(&state, &params(Some("students"), None, Some("person:u2"), None));
        assert_eq!(next.drawer, Some(Drawer::Person("u2".into())));
    }

    #[test]
    fn test_empty_values_clear() {
        let state = NavigationState {
            search: "bob".into(),
            drawer: Some(Drawer::Import(ImportTarget::Students)),
            show_archived: true,
            ..Default::default()
        };
        let next = reconcile(&state, &params(None, Some(""), Some(""), Some("")));
        assert_eq!(next, NavigationState::default());
    }

    #[test]
    fn test_unknown_values_are_ignored() {
        let state = NavigationState::default();
        let next = reconcile(&state, &params(Some("grades"), None, Some("modal:1"), Some("maybe")));
        assert_eq!(next.tab, ConsoleTab::Teachers);
        assert_eq!(next.drawer, None);
        assert!(!next.show_archived);
    }

    #[test]
    fn test_to_params_reconciles_back() {
        let state = NavigationState {
            tab: ConsoleTab::Sections,
            search: "group a".into(),
            drawer: Some(Drawer::Section("s1".into())),
            show_archived: true,
        };
        assert_eq!(reconcile(&NavigationState::default(), &state.to_params()), state);
    }

    #[test]
    fn test_matches_search() {
        let state = NavigationState {
            search: "ALI".into(),
            ..Default::default()
        };
        assert!(state.matches_search(["Alice", "alice@test.com"]));
        assert!(!state.matches_search(["Bob"]));
    }
}
