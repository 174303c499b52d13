//! Compound CSS selectors for the in-memory DOM.
//!
//! Supports one compound selector: an optional tag, an optional `#id`, any
//! number of `.class` parts and at most one attribute test (`[attr]`,
//! `[attr="v"]` or `[attr^="v"]`). That covers every selector the page uses;
//! the browser binding hands selectors to `querySelectorAll` unchanged.

/// Attribute test inside `[...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrTest {
    /// `[name]`
    Present(String),
    /// `[name="value"]`
    Equals(String, String),
    /// `[name^="value"]`
    Prefix(String, String),
}

/// A parsed compound selector
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleSelector {
    /// Tag name, lowercase
    pub tag: Option<String>,
    /// Required id
    pub id: Option<String>,
    /// Required classes
    pub classes: Vec<String>,
    /// Attribute test
    pub attr: Option<AttrTest>,
}

impl SimpleSelector {
    /// Parse a selector; returns `None` for unsupported syntax
    #[must_use]
    pub fn parse(selector: &str) -> Option<Self> {
        let s = selector.trim();
        if s.is_empty() || (s.contains(char::is_whitespace) && !s.contains('[')) {
            return None;
        }

        let (head, attr) = match s.find('[') {
            Some(open) => {
                let close = s.rfind(']')?;
                if close != s.len() - 1 || close < open {
                    return None;
                }
                (&s[..open], Some(parse_attr(&s[open + 1..close])?))
            }
            None => (s, None),
        };

        let mut out = Self {
            attr,
            ..Self::default()
        };

        let mut rest = head;
        let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
        if tag_end > 0 {
            out.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while !rest.is_empty() {
            let marker = rest.as_bytes()[0];
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return None;
            }
            match marker {
                b'#' => out.id = Some(name.to_string()),
                b'.' => out.classes.push(name.to_string()),
                _ => return None,
            }
            rest = &body[end..];
        }

        Some(out)
    }

    /// Test a node description against the selector
    #[must_use]
    pub fn matches(
        &self,
        tag: &str,
        id: Option<&str>,
        has_class: impl Fn(&str) -> bool,
        attribute: impl Fn(&str) -> Option<String>,
    ) -> bool {
        if let Some(t) = &self.tag {
            if !t.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(want) = &self.id {
            if id != Some(want.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| has_class(c)) {
            return false;
        }
        match &self.attr {
            None => true,
            Some(AttrTest::Present(name)) => attribute(name).is_some(),
            Some(AttrTest::Equals(name, value)) => attribute(name).as_deref() == Some(value),
            Some(AttrTest::Prefix(name, value)) => {
                attribute(name).is_some_and(|v| v.starts_with(value.as_str()))
            }
        }
    }
}

fn parse_attr(inner: &str) -> Option<AttrTest> {
    let inner = inner.trim();
    if let Some((name, value)) = inner.split_once("^=") {
        return Some(AttrTest::Prefix(
            name.trim().to_string(),
            unquote(value.trim()).to_string(),
        ));
    }
    if let Some((name, value)) = inner.split_once('=') {
        return Some(AttrTest::Equals(
            name.trim().to_string(),
            unquote(value.trim()).to_string(),
        ));
    }
    if inner.is_empty() {
        return None;
    }
    Some(AttrTest::Present(inner.to_string()))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}
