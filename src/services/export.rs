//! # 내보내기 형식 레지스트리
//!
//! 문서를 다른 형식(JSON, 인용 텍스트, EndNote, XML)으로 변환하는
//! 렌더러들을 이름으로 등록하고 찾아 씁니다.
//!
//! 핸들러 디스패치는 리플렉션이 아니라 명시적 맵 조회입니다.
//! 없는 형식 이름은 `UnknownFormat`으로 끝납니다 (404).

use crate::config::SearchConfig;
use crate::error::AppError;
use crate::models::SolrDocument;
use std::collections::BTreeMap;

/// 문서 하나를 문자열로 렌더링하는 함수
pub type RenderFn = fn(&SolrDocument, &SearchConfig) -> String;

/// 등록된 내보내기 형식 하나
pub struct ExportFormat {
    /// 응답의 Content-Type
    pub content_type: &'static str,
    pub render: RenderFn,
}

/// 이름 → 내보내기 형식 레지스트리
pub struct ExportRegistry {
    formats: BTreeMap<String, ExportFormat>,
}

impl ExportRegistry {
    pub fn new() -> Self {
        Self {
            formats: BTreeMap::new(),
        }
    }

    /// 기본 형식(json/citation/endnote/xml)이 등록된 레지스트리를 만듭니다.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            "json",
            ExportFormat {
                content_type: "application/json",
                render: render_json,
            },
        );
        registry.register(
            "citation",
            ExportFormat {
                content_type: "text/plain; charset=utf-8",
                render: render_citation,
            },
        );
        registry.register(
            "endnote",
            ExportFormat {
                content_type: "application/x-endnote-refer",
                render: render_endnote,
            },
        );
        registry.register(
            "xml",
            ExportFormat {
                content_type: "application/xml",
                render: render_xml,
            },
        );
        registry
    }

    pub fn register(&mut self, name: &str, format: ExportFormat) {
        self.formats.insert(name.to_string(), format);
    }

    /// 이름으로 형식을 찾습니다. 없으면 `UnknownFormat`입니다.
    pub fn get(&self, name: &str) -> Result<&ExportFormat, AppError> {
        self.formats
            .get(name)
            .ok_or_else(|| AppError::UnknownFormat(name.to_string()))
    }

    /// 이름으로 형식을 찾아 문서를 렌더링합니다.
    pub fn render(
        &self,
        name: &str,
        document: &SolrDocument,
        config: &SearchConfig,
    ) -> Result<(String, &'static str), AppError> {
        let format = self.get(name)?;
        Ok(((format.render)(document, config), format.content_type))
    }
}

impl Default for ExportRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn render_json(document: &SolrDocument, _config: &SearchConfig) -> String {
    serde_json::to_string_pretty(document).unwrap_or_else(|_| "{}".to_string())
}

/// 대표 필드 중심의 단순 인용 한 줄
fn render_citation(document: &SolrDocument, config: &SearchConfig) -> String {
    let title = document
        .first_str(&config.display_field)
        .unwrap_or("Unknown title");
    let authors = document.all_strs("author_display").join(", ");

    if authors.is_empty() {
        format!("{title}.")
    } else {
        format!("{authors}. {title}.")
    }
}

/// EndNote refer 형식 (%필드 태그 줄들)
fn render_endnote(document: &SolrDocument, config: &SearchConfig) -> String {
    let mut lines = vec!["%0 Generic".to_string()];

    if let Some(title) = document.first_str(&config.display_field) {
        lines.push(format!("%T {title}"));
    }
    for author in document.all_strs("author_display") {
        lines.push(format!("%A {author}"));
    }
    if let Some(publisher) = document.first_str("published_display") {
        lines.push(format!("%I {publisher}"));
    }
    if let Some(date) = document.first_str("pub_date") {
        lines.push(format!("%D {date}"));
    }

    lines.push(String::new());
    lines.join("\n")
}

/// 필드를 평탄한 <doc><field name=...> XML로 씁니다.
fn render_xml(document: &SolrDocument, _config: &SearchConfig) -> String {
    let mut out = String::from("<doc>\n");
    for (name, value) in &document.fields {
        match value {
            serde_json::Value::Array(items) => {
                for item in items {
                    out.push_str(&format!(
                        "  <field name=\"{}\">{}</field>\n",
                        xml_escape(name),
                        xml_escape(&value_text(item))
                    ));
                }
            }
            other => {
                out.push_str(&format!(
                    "  <field name=\"{}\">{}</field>\n",
                    xml_escape(name),
                    xml_escape(&value_text(other))
                ));
            }
        }
    }
    out.push_str("</doc>\n");
    out
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
