//! Checks available on `Chain<Elem>`.

use super::{element, ensure};
use crate::chain::Chain;
use crate::tag::Elem;

impl Chain<Elem> {
    /// Tag name, compared case-insensitively.
    pub fn has_tag(self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.queue("has_tag", move |v| {
            let el = element(v)?;
            ensure(el.tag_name.eq_ignore_ascii_case(&tag), || {
                format!("Expected <{tag}> element, got <{}>", el.tag_name)
            })
        })
    }

    pub fn has_class(self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.queue("has_class", move |v| {
            ensure(element(v)?.has_class(&class), || {
                format!("Expected element to have class {class:?}")
            })
        })
    }

    pub fn has_attribute(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.queue("has_attribute", move |v| {
            ensure(element(v)?.attribute(&name).is_some(), || {
                format!("Expected element to have attribute {name:?}")
            })
        })
    }

    pub fn attribute_equals(self, name: impl Into<String>, expected: impl Into<String>) -> Self {
        let (name, expected) = (name.into(), expected.into());
        self.queue("attribute_equals", move |v| {
            let actual = element(v)?.attribute(&name);
            ensure(actual.as_deref() == Some(expected.as_str()), || match &actual {
                Some(actual) => {
                    format!("Expected attribute {name:?} to be {expected:?}, got {actual:?}")
                }
                None => format!("Expected element to have attribute {name:?}"),
            })
        })
    }

    pub fn has_id(self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.queue("has_id", move |v| {
            ensure(element(v)?.id.as_deref() == Some(id.as_str()), || {
                format!("Expected element with id {id:?}")
            })
        })
    }

    /// At least one child node.
    pub fn has_children(self) -> Self {
        self.queue("has_children", |v| {
            ensure(element(v)?.child_count > 0, || {
                "Expected element to have children".into()
            })
        })
    }
}
