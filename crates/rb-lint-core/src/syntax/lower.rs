//! Lowering from the tree-sitter Ruby tree into [`SyntaxTree`].

use tree_sitter::Node;

use super::tree::{ConstRef, NamespaceDecl, NodeId, NodeKind, Span, SyntaxTree};

pub(super) fn lower(root: Node<'_>, source: &str) -> SyntaxTree {
    let mut lowering = Lowering {
        source,
        tree: SyntaxTree::default(),
    };
    let id = lowering.tree.push(NodeKind::Other, None, span_of(root));
    lowering.children(root, id);
    lowering.tree
}

struct Lowering<'s> {
    source: &'s str,
    tree: SyntaxTree,
}

impl Lowering<'_> {
    fn text(&self, node: Node<'_>) -> String {
        node.utf8_text(self.source.as_bytes())
            .unwrap_or("")
            .to_string()
    }

    fn children(&mut self, node: Node<'_>, parent: NodeId) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.node(child, parent);
        }
    }

    fn node(&mut self, node: Node<'_>, parent: NodeId) {
        match node.kind() {
            "module" | "class" => self.namespace(node, parent),
            "assignment" | "operator_assignment" => self.assignment(node, parent),
            "left_assignment_list" | "destructured_left_assignment" => {
                self.assignment_targets(node, parent);
            }
            "constant" => {
                self.constant(node, parent);
            }
            "scope_resolution" => {
                self.scope_resolution(node, parent);
            }
            "call" => self.call(node, parent),
            _ => {
                let id = self.tree.push(NodeKind::Other, Some(parent), span_of(node));
                self.children(node, id);
            }
        }
    }

    fn namespace(&mut self, node: Node<'_>, parent: NodeId) {
        let id = self.tree.push(
            NodeKind::NamespaceDecl(NamespaceDecl {
                segments: Vec::new(),
                header: None,
            }),
            Some(parent),
            span_of(node),
        );

        let name = node.child_by_field_name("name");
        let mut header = None;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if Some(child) == name {
                header = self.header(child, id);
            } else {
                self.node(child, id);
            }
        }

        let segments = header.map_or_else(Vec::new, |h| self.tree.const_segments(h));
        if let NodeKind::NamespaceDecl(decl) = self.tree.kind_mut(id) {
            decl.segments = segments;
            decl.header = header;
        }
    }

    fn header(&mut self, node: Node<'_>, parent: NodeId) -> Option<NodeId> {
        match node.kind() {
            "constant" => Some(self.constant(node, parent)),
            "scope_resolution" => Some(self.scope_resolution(node, parent)),
            _ => {
                self.node(node, parent);
                None
            }
        }
    }

    fn assignment(&mut self, node: Node<'_>, parent: NodeId) {
        let left = node.child_by_field_name("left");
        let Some(left) = left.filter(|l| l.kind() == "constant") else {
            let id = self.tree.push(NodeKind::Other, Some(parent), span_of(node));
            self.children(node, id);
            return;
        };

        let id = self.tree.push(
            NodeKind::ConstAssign {
                name: self.text(left),
            },
            Some(parent),
            span_of(node),
        );
        if let Some(right) = node.child_by_field_name("right") {
            self.node(right, id);
        }
    }

    fn assignment_targets(&mut self, node: Node<'_>, parent: NodeId) {
        let id = self.tree.push(NodeKind::Other, Some(parent), span_of(node));
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "constant" {
                self.tree.push(
                    NodeKind::ConstAssign {
                        name: self.text(child),
                    },
                    Some(id),
                    span_of(child),
                );
            } else {
                self.node(child, id);
            }
        }
    }

    fn constant(&mut self, node: Node<'_>, parent: NodeId) -> NodeId {
        self.tree.push(
            NodeKind::ConstRef(ConstRef {
                name: self.text(node),
                scope: None,
                rooted: false,
            }),
            Some(parent),
            span_of(node),
        )
    }

    fn scope_resolution(&mut self, node: Node<'_>, parent: NodeId) -> NodeId {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();
        let scope = node.child_by_field_name("scope");

        let id = self.tree.push(
            NodeKind::ConstRef(ConstRef {
                name,
                scope: None,
                rooted: scope.is_none(),
            }),
            Some(parent),
            span_of(node),
        );

        if let Some(scope) = scope {
            // Every lowered node pushes exactly one child, so the scope is the first.
            self.node(scope, id);
            let scope_id = self.tree.children(id).first().copied();
            if let NodeKind::ConstRef(r) = self.tree.kind_mut(id) {
                r.scope = scope_id;
            }
        }
        id
    }

    fn call(&mut self, node: Node<'_>, parent: NodeId) {
        // `Integer(1)` is a method call named like a constant.
        let method = node.child_by_field_name("method");
        let id = self.tree.push(NodeKind::Other, Some(parent), span_of(node));
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if Some(child) == method && child.kind() == "constant" {
                continue;
            }
            self.node(child, id);
        }
    }
}

fn span_of(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

#[cfg(test)]
mod tests {
    use crate::syntax::{NodeKind, SourceFile};

    fn outline(source: &str) -> Vec<String> {
        let file = SourceFile::parse(source).unwrap();
        let tree = file.syntax();
        tree.preorder()
            .filter_map(|id| match tree.kind(id) {
                NodeKind::NamespaceDecl(d) => Some(format!("ns {}", d.segments.join("::"))),
                NodeKind::ConstAssign { name } => Some(format!("assign {name}")),
                NodeKind::ConstRef(r) => Some(format!(
                    "ref {}{}{}",
                    if r.rooted { "::" } else { "" },
                    r.name,
                    if r.scope.is_some() { " (scoped)" } else { "" }
                )),
                NodeKind::Other => None,
            })
            .collect()
    }

    #[test]
    fn lowers_namespaces_and_headers() {
        let items = outline("module Outer\n  class Inner::Deep < Base\n  end\nend\n");
        assert_eq!(
            items,
            vec![
                "ns Outer",
                "ref Outer",
                "ns Inner::Deep",
                "ref Deep (scoped)",
                "ref Inner",
                "ref Base",
            ]
        );
    }

    #[test]
    fn header_is_recorded_on_declaration() {
        let file = SourceFile::parse("class Parent::Child\nend\n").unwrap();
        let tree = file.syntax();
        let decl = tree
            .preorder()
            .find(|&id| tree.namespace(id).is_some())
            .unwrap();
        let header = tree.namespace(decl).unwrap().header.unwrap();
        assert!(tree.is_namespace_header(header));
        assert_eq!(tree.const_segments(header), vec!["Parent", "Child"]);
    }

    #[test]
    fn assignments_are_not_references() {
        let items = outline("VALUE = Other::THING\nA, B = 1, 2\nLIMIT ||= 3\n");
        assert_eq!(
            items,
            vec![
                "assign VALUE",
                "ref THING (scoped)",
                "ref Other",
                "assign A",
                "assign B",
                "assign LIMIT",
            ]
        );
    }

    #[test]
    fn constant_named_calls_are_skipped() {
        let items = outline("Integer(42)\nBigDecimal('1.5')\nFoo.bar(Baz)\n");
        assert_eq!(items, vec!["ref Foo", "ref Baz"]);
    }

    #[test]
    fn rooted_references_are_marked() {
        let items = outline("::Foo::Bar.new\n");
        assert_eq!(items, vec!["ref Bar (scoped)", "ref ::Foo"]);
    }
}
