//! HTML template trees and the layout registry.
//!
//! Layout fragments are plain HTML with directive attributes; a lightweight
//! hand-rolled parser covers that surface without pulling in a full HTML5
//! parsing stack. Parsed templates are immutable and may be shared
//! read-only across any number of page renders.

use std::collections::HashMap;

use crate::error::TemplateError;

/// Elements that never carry children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// One attribute on an element, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub name: String,
    /// `None` for bare attributes written without an `=`.
    pub value: Option<String>,
}

/// A node in a parsed template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// Raw text, copied through unchanged.
    Text(String),
    /// An HTML comment.
    Comment(String),
    /// A doctype or other `<!...>` declaration.
    Doctype(String),
}

/// An element and its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
    /// Whether the tag is a void element (no closing tag in output).
    pub void: bool,
}

impl Element {
    /// Look up an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }
}

/// A named, parsed layout template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template source into a tree.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, TemplateError> {
        let mut parser = Parser {
            input: source,
            pos: 0,
        };
        let nodes = parser.parse_nodes(None)?;
        Ok(Self {
            name: name.into(),
            nodes,
        })
    }

    /// The template's registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parsed node tree.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

/// Registry of layout templates, keyed by the names frontmatter refers to.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under its name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }
}

/// Hand-rolled scanner over template source.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Parse sibling nodes until EOF or the closing tag of `open_tag`.
    fn parse_nodes(&mut self, open_tag: Option<&str>) -> Result<Vec<Node>, TemplateError> {
        let mut nodes = Vec::new();

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return match open_tag {
                    Some(tag) => Err(TemplateError::UnclosedTag(tag.to_string())),
                    None => Ok(nodes),
                };
            }

            let Some(lt) = rest.find('<') else {
                nodes.push(Node::Text(rest.to_string()));
                self.pos = self.input.len();
                continue;
            };

            if lt > 0 {
                nodes.push(Node::Text(rest[..lt].to_string()));
                self.pos += lt;
                continue;
            }

            if rest.starts_with("<!--") {
                let Some(end) = rest[4..].find("-->") else {
                    return Err(TemplateError::MalformedTag(snippet(rest)));
                };
                nodes.push(Node::Comment(rest[4..4 + end].to_string()));
                self.pos += 4 + end + 3;
                continue;
            }

            if rest.starts_with("<!") {
                let Some(end) = rest.find('>') else {
                    return Err(TemplateError::MalformedTag(snippet(rest)));
                };
                nodes.push(Node::Doctype(rest[2..end].to_string()));
                self.pos += end + 1;
                continue;
            }

            if let Some(after) = rest.strip_prefix("</") {
                let name_len = tag_name_len(after);
                if name_len == 0 {
                    return Err(TemplateError::MalformedTag(snippet(rest)));
                }
                let name = &after[..name_len];
                let after_name = after[name_len..].trim_start();
                if !after_name.starts_with('>') {
                    return Err(TemplateError::MalformedTag(snippet(rest)));
                }
                let consumed = 2 + (after.len() - after_name.len()) + 1;

                return match open_tag {
                    Some(tag) if tag == name => {
                        self.pos += consumed;
                        Ok(nodes)
                    }
                    Some(tag) => Err(TemplateError::MismatchedClose {
                        expected: tag.to_string(),
                        found: name.to_string(),
                    }),
                    None => Err(TemplateError::UnexpectedClose(name.to_string())),
                };
            }

            nodes.push(self.parse_element()?);
        }
    }

    /// Parse an open tag, its attributes, and (for non-void tags) children.
    fn parse_element(&mut self) -> Result<Node, TemplateError> {
        let rest = self.rest();
        debug_assert!(rest.starts_with('<'));

        let after = &rest[1..];
        let name_len = tag_name_len(after);
        if name_len == 0 {
            return Err(TemplateError::MalformedTag(snippet(rest)));
        }
        let tag = after[..name_len].to_string();
        self.pos += 1 + name_len;

        let (attrs, self_closed) = self.parse_attrs(&tag)?;
        let void = VOID_ELEMENTS.contains(&tag.as_str());

        let children = if void || self_closed {
            Vec::new()
        } else {
            self.parse_nodes(Some(&tag))?
        };

        Ok(Node::Element(Element {
            tag,
            attrs,
            children,
            void,
        }))
    }

    /// Parse attributes up to and including the `>` or `/>`.
    fn parse_attrs(&mut self, tag: &str) -> Result<(Vec<Attr>, bool), TemplateError> {
        let mut attrs = Vec::new();

        loop {
            self.skip_whitespace();
            let rest = self.rest();

            if rest.is_empty() {
                return Err(TemplateError::UnclosedTag(tag.to_string()));
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok((attrs, true));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok((attrs, false));
            }

            let name_len = rest
                .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
                .unwrap_or(rest.len());
            if name_len == 0 {
                return Err(TemplateError::MalformedTag(snippet(rest)));
            }
            let name = rest[..name_len].to_string();
            self.pos += name_len;

            self.skip_whitespace();

            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                Some(self.parse_attr_value(tag)?)
            } else {
                None
            };

            attrs.push(Attr { name, value });
        }
    }

    fn parse_attr_value(&mut self, tag: &str) -> Result<String, TemplateError> {
        let rest = self.rest();
        match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &rest[1..];
                let Some(end) = inner.find(quote) else {
                    return Err(TemplateError::UnterminatedAttribute(tag.to_string()));
                };
                self.pos += 1 + end + 1;
                Ok(inner[..end].to_string())
            }
            Some(_) => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                Ok(rest[..end].to_string())
            }
            None => Err(TemplateError::UnterminatedAttribute(tag.to_string())),
        }
    }
}

/// Length of a tag name: letters, digits, `-`.
fn tag_name_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(s.len())
}

fn snippet(s: &str) -> String {
    s.chars().take(32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_element() {
        let template = Template::parse("test", "<h1 :text=\"$page.title\"></h1>").expect("parse");
        let [Node::Element(el)] = template.nodes() else {
            panic!("expected one element");
        };
        assert_eq!(el.tag, "h1");
        assert_eq!(el.attr(":text"), Some("$page.title"));
        assert!(el.children.is_empty());
    }

    #[test]
    fn test_parse_nested_elements_and_text() {
        let template =
            Template::parse("test", "<div><span>hello</span> world</div>").expect("parse");
        let [Node::Element(div)] = template.nodes() else {
            panic!("expected one element");
        };
        assert_eq!(div.tag, "div");
        assert_eq!(div.children.len(), 2);
        let Node::Element(span) = &div.children[0] else {
            panic!("expected span");
        };
        assert_eq!(span.children, vec![Node::Text("hello".to_string())]);
        assert_eq!(div.children[1], Node::Text(" world".to_string()));
    }

    #[test]
    fn test_parse_void_and_self_closing() {
        let template = Template::parse("test", "<img src=\"x.png\"><br><span/>").expect("parse");
        assert_eq!(template.nodes().len(), 3);
        let Node::Element(img) = &template.nodes()[0] else {
            panic!("expected img");
        };
        assert!(img.void);
        assert_eq!(img.attr("src"), Some("x.png"));
        let Node::Element(span) = &template.nodes()[2] else {
            panic!("expected span");
        };
        assert!(!span.void);
        assert!(span.children.is_empty());
    }

    #[test]
    fn test_parse_comment_and_doctype() {
        let template =
            Template::parse("test", "<!DOCTYPE html><!-- note --><p>x</p>").expect("parse");
        assert_eq!(template.nodes()[0], Node::Doctype("DOCTYPE html".to_string()));
        assert_eq!(template.nodes()[1], Node::Comment(" note ".to_string()));
    }

    #[test]
    fn test_attribute_order_preserved() {
        let template =
            Template::parse("test", "<a href=\"/x\" class=\"btn\" data-k=v></a>").expect("parse");
        let [Node::Element(a)] = template.nodes() else {
            panic!("expected one element");
        };
        let names: Vec<_> = a.attrs.iter().map(|attr| attr.name.as_str()).collect();
        assert_eq!(names, vec!["href", "class", "data-k"]);
        assert_eq!(a.attr("data-k"), Some("v"));
    }

    #[test]
    fn test_bare_and_empty_attributes_distinguished() {
        let template = Template::parse("test", "<input value=\"\" disabled>").expect("parse");
        let [Node::Element(input)] = template.nodes() else {
            panic!("expected one element");
        };
        assert_eq!(input.attrs[0].value, Some(String::new()));
        assert_eq!(input.attrs[1].value, None);
        // Lookup flattens both to an empty string.
        assert_eq!(input.attr("value"), Some(""));
        assert_eq!(input.attr("disabled"), Some(""));
    }

    #[test]
    fn test_unclosed_tag() {
        let err = Template::parse("test", "<div><span></div>").unwrap_err();
        assert_eq!(
            err,
            TemplateError::MismatchedClose {
                expected: "span".to_string(),
                found: "div".to_string(),
            }
        );

        let err = Template::parse("test", "<div>").unwrap_err();
        assert_eq!(err, TemplateError::UnclosedTag("div".to_string()));
    }

    #[test]
    fn test_unexpected_close() {
        let err = Template::parse("test", "text</div>").unwrap_err();
        assert_eq!(err, TemplateError::UnexpectedClose("div".to_string()));
    }

    #[test]
    fn test_unterminated_attribute() {
        let err = Template::parse("test", "<a href=\"/x></a>").unwrap_err();
        assert_eq!(err, TemplateError::UnterminatedAttribute("a".to_string()));
    }

    #[test]
    fn test_registry() {
        let mut registry = TemplateRegistry::new();
        registry.register(Template::parse("page", "<main></main>").expect("parse"));

        assert!(registry.get("page").is_some());
        assert!(registry.get("missing").is_none());
    }
}
