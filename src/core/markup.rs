use crate::domain::model::MetaTag;

/// Escapes `& < > " '` so the value is safe in XML text and HTML attributes.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl MetaTag {
    pub fn to_html(&self) -> String {
        let (attribute, key) = if let Some(name) = &self.name {
            ("name", name)
        } else if let Some(property) = &self.property {
            ("property", property)
        } else if let Some(http_equiv) = &self.http_equiv {
            ("http-equiv", http_equiv)
        } else {
            return String::new();
        };

        format!(
            r#"<meta {}="{}" content="{}" />"#,
            attribute,
            escape_xml(key),
            escape_xml(&self.content)
        )
    }
}

/// One `<meta … />` element per line.
pub fn render_meta_tags(tags: &[MetaTag]) -> String {
    tags.iter()
        .map(MetaTag::to_html)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml_all_five() {
        assert_eq!(
            escape_xml(r#"a&b<c>d"e'f"#),
            "a&amp;b&lt;c&gt;d&quot;e&apos;f"
        );
    }

    #[test]
    fn test_meta_tag_html_forms() {
        assert_eq!(
            MetaTag::name("description", "Fast \"sites\"").to_html(),
            r#"<meta name="description" content="Fast &quot;sites&quot;" />"#
        );
        assert_eq!(
            MetaTag::property("og:type", "website").to_html(),
            r#"<meta property="og:type" content="website" />"#
        );
        assert_eq!(
            MetaTag::http_equiv("refresh", "30").to_html(),
            r#"<meta http-equiv="refresh" content="30" />"#
        );
    }

    #[test]
    fn test_render_meta_tags_joins_lines() {
        let html = render_meta_tags(&[
            MetaTag::name("title", "Home"),
            MetaTag::name("robots", "noindex"),
        ]);
        assert_eq!(
            html,
            "<meta name=\"title\" content=\"Home\" />\n<meta name=\"robots\" content=\"noindex\" />"
        );
    }
}
