//! Typed views over tree nodes.
//!
//! Each struct wraps a [`Node`] and provides typed accessors over its fields.
//! Cast checks the kind only; views never assume a field is present, since a
//! tree built from broken input may lack any of them.

use super::syntax_kind::SyntaxKind;
use super::tree::{Field, Node, NodeKind};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'t>(Node<'t>);

        impl<'t> $name<'t> {
            pub fn cast(node: Node<'t>) -> Option<Self> {
                (node.kind() == NodeKind::$kind).then_some(Self(node))
            }

            pub fn as_node(&self) -> Node<'t> {
                self.0
            }
        }
    };
}

ast_node!(SourceFile, SourceFile);
ast_node!(PackageDecl, PackageDecl);
ast_node!(PackageBody, PackageBody);
ast_node!(ProcedureDecl, ProcedureDecl);
ast_node!(FunctionDecl, FunctionDecl);
ast_node!(ParameterDecl, ParameterDecl);
ast_node!(VariableDecl, VariableDecl);
ast_node!(IfStmt, IfStmt);
ast_node!(Annotation, Annotation);
ast_node!(ExceptionHandler, ExceptionHandler);

/// IFS naming convention for subprogram visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// No underscore suffix.
    Public,
    /// Name ends in `__`.
    Protected,
    /// Name ends in `___`.
    Private,
}

impl Visibility {
    pub fn of(name: &str) -> Self {
        if name.ends_with("___") {
            Self::Private
        } else if name.ends_with("__") {
            Self::Protected
        } else {
            Self::Public
        }
    }
}

/// Parameter passing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    In,
    Out,
    InOut,
}

/// Procedure or function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subprogram<'t> {
    Procedure(ProcedureDecl<'t>),
    Function(FunctionDecl<'t>),
}

/// A top-level or package-level unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit<'t> {
    Package(PackageDecl<'t>),
    PackageBody(PackageBody<'t>),
    Subprogram(Subprogram<'t>),
}

fn field_text<'t>(node: Node<'t>, field: Field) -> Option<&'t str> {
    node.first_field(field).map(|n| n.text())
}

fn annotations<'t>(node: Node<'t>) -> impl Iterator<Item = Annotation<'t>> + use<'t> {
    node.field(Field::Annotations).filter_map(Annotation::cast)
}

fn parameters<'t>(node: Node<'t>) -> impl Iterator<Item = ParameterDecl<'t>> + use<'t> {
    node.field(Field::Parameters).filter_map(ParameterDecl::cast)
}

fn subprograms<'t>(node: Node<'t>) -> impl Iterator<Item = Subprogram<'t>> + use<'t> {
    node.field(Field::Declarations).filter_map(Subprogram::cast)
}

impl<'t> SourceFile<'t> {
    pub fn units(&self) -> impl Iterator<Item = Unit<'t>> + use<'t> {
        self.0.child_nodes().filter_map(Unit::cast)
    }

    /// Name from a `layer X;` header, if any.
    pub fn layer(&self) -> Option<&'t str> {
        self.0
            .child_nodes()
            .find(|n| n.kind() == NodeKind::LayerDirective)
            .and_then(|n| field_text(n, Field::Name))
    }
}

impl<'t> Unit<'t> {
    pub fn cast(node: Node<'t>) -> Option<Self> {
        match node.kind() {
            NodeKind::PackageDecl => PackageDecl::cast(node).map(Unit::Package),
            NodeKind::PackageBody => PackageBody::cast(node).map(Unit::PackageBody),
            _ => Subprogram::cast(node).map(Unit::Subprogram),
        }
    }

    pub fn as_node(&self) -> Node<'t> {
        match self {
            Unit::Package(n) => n.as_node(),
            Unit::PackageBody(n) => n.as_node(),
            Unit::Subprogram(n) => n.as_node(),
        }
    }

    pub fn name(&self) -> Option<&'t str> {
        field_text(self.as_node(), Field::Name)
    }
}

impl<'t> PackageDecl<'t> {
    pub fn name(&self) -> Option<&'t str> {
        field_text(self.0, Field::Name)
    }

    pub fn annotations(&self) -> impl Iterator<Item = Annotation<'t>> + use<'t> {
        annotations(self.0)
    }

    pub fn declarations(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.0.field(Field::Declarations)
    }

    pub fn subprograms(&self) -> impl Iterator<Item = Subprogram<'t>> + use<'t> {
        subprograms(self.0)
    }
}

impl<'t> PackageBody<'t> {
    pub fn name(&self) -> Option<&'t str> {
        field_text(self.0, Field::Name)
    }

    pub fn declarations(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.0.field(Field::Declarations)
    }

    pub fn subprograms(&self) -> impl Iterator<Item = Subprogram<'t>> + use<'t> {
        subprograms(self.0)
    }

    /// Statements of the initialization section.
    pub fn initialization(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.0.field(Field::Body)
    }
}

impl<'t> Subprogram<'t> {
    pub fn cast(node: Node<'t>) -> Option<Self> {
        match node.kind() {
            NodeKind::ProcedureDecl => ProcedureDecl::cast(node).map(Subprogram::Procedure),
            NodeKind::FunctionDecl => FunctionDecl::cast(node).map(Subprogram::Function),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Node<'t> {
        match self {
            Subprogram::Procedure(n) => n.as_node(),
            Subprogram::Function(n) => n.as_node(),
        }
    }

    pub fn name(&self) -> Option<&'t str> {
        field_text(self.as_node(), Field::Name)
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::of(self.name().unwrap_or_default())
    }

    pub fn annotations(&self) -> impl Iterator<Item = Annotation<'t>> + use<'t> {
        annotations(self.as_node())
    }

    pub fn parameters(&self) -> impl Iterator<Item = ParameterDecl<'t>> + use<'t> {
        parameters(self.as_node())
    }

    pub fn declarations(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.as_node().field(Field::Declarations)
    }

    pub fn body(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.as_node().field(Field::Body)
    }

    pub fn exception_handlers(&self) -> impl Iterator<Item = ExceptionHandler<'t>> + use<'t> {
        self.as_node()
            .field(Field::ExceptionHandler)
            .filter_map(ExceptionHandler::cast)
    }

    pub fn end_name(&self) -> Option<&'t str> {
        field_text(self.as_node(), Field::EndName)
    }

    /// `PROCEDURE p(...);` without `IS`.
    pub fn is_forward(&self) -> bool {
        !self
            .as_node()
            .child_tokens()
            .any(|t| matches!(t.kind(), SyntaxKind::KwIs | SyntaxKind::KwAs))
    }
}

impl<'t> ProcedureDecl<'t> {
    pub fn name(&self) -> Option<&'t str> {
        field_text(self.0, Field::Name)
    }

    pub fn parameters(&self) -> impl Iterator<Item = ParameterDecl<'t>> + use<'t> {
        parameters(self.0)
    }

    pub fn body(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.0.field(Field::Body)
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::of(self.name().unwrap_or_default())
    }
}

impl<'t> FunctionDecl<'t> {
    pub fn name(&self) -> Option<&'t str> {
        field_text(self.0, Field::Name)
    }

    pub fn parameters(&self) -> impl Iterator<Item = ParameterDecl<'t>> + use<'t> {
        parameters(self.0)
    }

    pub fn return_type(&self) -> Option<Node<'t>> {
        self.0.first_field(Field::ReturnType)
    }

    pub fn body(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.0.field(Field::Body)
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::of(self.name().unwrap_or_default())
    }
}

impl<'t> ParameterDecl<'t> {
    pub fn name(&self) -> Option<&'t str> {
        field_text(self.0, Field::Name)
    }

    fn mode_tokens(&self) -> impl Iterator<Item = SyntaxKind> + use<'t> {
        self.0
            .field(Field::Direction)
            .flat_map(|n| n.child_tokens())
            .map(|t| t.kind())
    }

    pub fn direction(&self) -> Direction {
        let (mut input, mut output) = (false, false);
        for kind in self.mode_tokens() {
            input |= kind == SyntaxKind::KwIn;
            output |= kind == SyntaxKind::KwOut;
        }
        match (input, output) {
            (true, true) => Direction::InOut,
            (false, true) => Direction::Out,
            _ => Direction::In,
        }
    }

    pub fn nocopy(&self) -> bool {
        self.mode_tokens().any(|kind| kind == SyntaxKind::KwNocopy)
    }

    pub fn type_spec(&self) -> Option<Node<'t>> {
        self.0.first_field(Field::Type)
    }

    pub fn default_value(&self) -> Option<Node<'t>> {
        self.0.first_field(Field::DefaultValue)
    }
}

impl<'t> VariableDecl<'t> {
    pub fn name(&self) -> Option<&'t str> {
        field_text(self.0, Field::Name)
    }

    pub fn type_spec(&self) -> Option<Node<'t>> {
        self.0.first_field(Field::Type)
    }

    pub fn is_not_null(&self) -> bool {
        self.0.has_field(Field::Constraint)
    }

    pub fn default_value(&self) -> Option<Node<'t>> {
        self.0.first_field(Field::DefaultValue)
    }
}

impl<'t> IfStmt<'t> {
    pub fn condition(&self) -> Option<Node<'t>> {
        self.0.first_field(Field::Condition)
    }

    pub fn then_body(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.0.field(Field::ThenBody)
    }

    pub fn elsif_clauses(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.0.field(Field::ElsifClauses)
    }

    pub fn else_body(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.0
            .field(Field::ElseClause)
            .flat_map(|clause| clause.field(Field::Body))
    }
}

impl<'t> Annotation<'t> {
    /// Name without the `@`.
    pub fn name(&self) -> &'t str {
        self.0
            .child_tokens()
            .next()
            .map_or("", |t| t.text().trim_start_matches('@'))
    }

    pub fn arguments(&self) -> Option<&'t str> {
        field_text(self.0, Field::Arguments)
    }
}

impl<'t> ExceptionHandler<'t> {
    pub fn exceptions(&self) -> impl Iterator<Item = &'t str> + use<'t> {
        self.0.field(Field::Exceptions).map(|n| n.text())
    }

    pub fn is_catch_all(&self) -> bool {
        self.exceptions().any(|e| e.eq_ignore_ascii_case("others"))
    }

    pub fn body(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.0.field(Field::Body)
    }
}

/// `SELECT`, including its `INTO` and `BULK COLLECT INTO` forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectStmt<'t>(Node<'t>);

impl<'t> SelectStmt<'t> {
    pub fn cast(node: Node<'t>) -> Option<Self> {
        matches!(
            node.kind(),
            NodeKind::SelectStmt | NodeKind::SelectIntoStmt | NodeKind::BulkCollectIntoStmt
        )
        .then_some(Self(node))
    }

    pub fn as_node(&self) -> Node<'t> {
        self.0
    }

    pub fn select_list(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.0.field(Field::SelectList)
    }

    pub fn from(&self) -> Option<Node<'t>> {
        self.0.first_field(Field::From)
    }

    pub fn where_clause(&self) -> Option<Node<'t>> {
        self.0.first_field(Field::Where)
    }

    pub fn into_targets(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.0.field(Field::Into)
    }

    pub fn is_bulk_collect(&self) -> bool {
        self.0.kind() == NodeKind::BulkCollectIntoStmt
    }
}
