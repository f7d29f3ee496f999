use crate::utils::normalize_text;
use anyhow::{format_err, Error};
use libxml::parser::Parser;
use libxml::tree::{self, Document, NodeType};
use libxml::xpath::Context;
use std::{fmt, ops::Deref, rc::Rc};

#[derive(Debug)]
pub enum Value {
    Element(Vec<Node>),
    Text(Vec<String>),
    None,
}

impl Value {
    pub fn into_element(self) -> Option<Vec<Node>> {
        match self {
            Value::Element(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<Vec<String>> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// 带有文档上下文的 HTML 节点
pub struct Node {
    document: Rc<Document>,
    context: Rc<Context>,
    node: tree::Node,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.get_type() {
            Some(NodeType::ElementNode) => {
                write!(f, "<Element {} at {:p}>", self.get_name(), self.node_ptr())
            }
            _ => write!(f, "{:?}", self.get_content()),
        }
    }
}

impl Node {
    pub fn xpath_text(&self, xpath: &str) -> Result<Vec<String>, Error> {
        match self.xpath(xpath)?.into_text() {
            Some(v) => Ok(v),
            None => Err(format_err!("not found: {}", xpath)),
        }
    }

    pub fn xpath_elem(&self, xpath: &str) -> Result<Vec<Node>, Error> {
        match self.xpath(xpath)?.into_element() {
            Some(v) => Ok(v),
            None => Err(format_err!("not found: {}", xpath)),
        }
    }

    pub fn xpath(&self, xpath: &str) -> Result<Value, Error> {
        let nodes = self
            .context
            .node_evaluate(xpath, &self.node)
            .map_err(|_| format_err!("failed to evaluate xpath"))?
            .get_nodes_as_vec();
        let result = match nodes.get(0).and_then(|node| node.get_type()) {
            Some(NodeType::ElementNode) => Value::Element(
                nodes
                    .into_iter()
                    .map(|node| Node {
                        document: self.document.clone(),
                        context: self.context.clone(),
                        node,
                    })
                    .collect(),
            ),
            Some(_) => Value::Text(nodes.into_iter().map(|node| node.get_content()).collect()),
            None => Value::None,
        };
        Ok(result)
    }

    /// 第一个指定标签的元素，包括自身
    pub fn first_by_tag(&self, tag: &str) -> Result<Node, Error> {
        self.xpath_elem(&format!("(descendant-or-self::{})[1]", tag))?
            .into_iter()
            .next()
            .ok_or_else(|| format_err!("找不到 <{}>", tag))
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.get_property(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// 元素的文本，空白会被合并
    pub fn text(&self) -> String {
        normalize_text(&self.get_content())
    }
}

impl Deref for Node {
    type Target = tree::Node;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

pub fn parse_html<S: AsRef<str>>(html: S) -> Result<Node, Error> {
    let parser = Parser::default_html();
    let document = parser
        .parse_string(html.as_ref())
        .map_err(|_| format_err!("failed to parse html"))?;
    let context = Context::new(&document).map_err(|_| format_err!("failed to new context"))?;
    let root = document
        .get_root_element()
        .ok_or_else(|| format_err!("no root element"))?;
    Ok(Node {
        document: Rc::new(document),
        context: Rc::new(context),
        node: root,
    })
}
