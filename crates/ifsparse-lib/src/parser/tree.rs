//! Index-based syntax tree.
//!
//! Nodes live in a flat arena and refer to their children by [`NodeId`] and
//! [`TokenId`]; there are no parent pointers. Children are stored in source
//! order and named fields point at a subset of the direct child nodes, so a
//! consumer can either walk positionally or ask for `name`, `body`, ... directly.
//!
//! The tree is built bottom-up by [`TreeBuilder`], which mirrors rowan's green
//! builder API (`start_node`, `checkpoint`, `start_node_at`, `finish_node`).
//! Once built it is immutable.

use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq};

use super::lexer::{Token as LexToken, Trivia};
use super::span::{LineCol, LineIndex, TextRange, TextSize};
use super::syntax_kind::SyntaxKind;

macro_rules! node_kinds {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        /// Closed set of node kinds.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub enum NodeKind {
            $($(#[$doc])* $name,)*
        }

        impl NodeKind {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)*
                }
            }
        }
    };
}

node_kinds! {
    SourceFile,
    /// Skipped or unparseable input.
    Error,

    // Leaves: wrap exactly the tokens that form them
    Identifier,
    QualifiedIdentifier,
    Literal,
    Operator,
    Modifier,
    Annotation,
    AnnotationArguments,
    Wildcard,
    BindVariable,
    InquiryDirective,

    // Declarations
    PackageDecl,
    PackageBody,
    ProcedureDecl,
    FunctionDecl,
    ParameterDecl,
    VariableDecl,
    ConstantDecl,
    CursorDecl,
    RecordTypeDecl,
    RecordField,
    TableTypeDecl,
    VarrayTypeDecl,
    RefCursorTypeDecl,
    SubtypeDecl,
    ExceptionDecl,
    PragmaDirective,
    TypeSpec,
    LayerDirective,

    // Statements
    NullStmt,
    AssignmentStmt,
    IfStmt,
    ElsifClause,
    ElseClause,
    LoopStmt,
    WhileLoopStmt,
    ForLoopStmt,
    ForallStmt,
    ReturnStmt,
    RaiseStmt,
    CallStmt,
    AnonymousBlock,
    CaseStmt,
    CaseWhenClause,
    ExecuteImmediateStmt,
    UsingArgument,
    OpenCursorStmt,
    FetchStmt,
    CloseStmt,
    ExitStmt,
    ContinueStmt,
    LabelStmt,
    GotoStmt,
    ExceptionHandler,
    ReturningClause,

    // Directives
    ConditionalCompilation,
    ErrorDirective,
    TemplateDirective,
    TemplateSection,
    TemplateText,

    // SQL
    SelectStmt,
    SelectIntoStmt,
    BulkCollectIntoStmt,
    SetOperation,
    CommonTableExpr,
    SelectItem,
    TableRef,
    TableCollectionExpr,
    ImplicitJoin,
    JoinClause,
    ApplyClause,
    WhereCurrentOf,
    HierarchicalClause,
    ForUpdateClause,
    OrderByClause,
    OrderByItem,
    InsertStmt,
    UpdateStmt,
    SetClause,
    DeleteStmt,
    MergeStmt,
    MergeMatchedClause,
    MergeNotMatchedClause,
    CommitStmt,
    RollbackStmt,
    SavepointStmt,

    // Expressions
    BinaryExpr,
    UnaryExpr,
    ParenthesizedExpr,
    MemberAccess,
    FunctionCall,
    NamedArgument,
    ExistsExpr,
    PriorExpr,
    CursorAttribute,
    ExtractExpr,
    CastExpr,
    OverClause,
    WindowFrame,
    CaseExpr,
    Subquery,
    BetweenExpr,
    InExpr,
    LikeExpr,
    IsNullExpr,
    ExpressionList,
}

impl NodeKind {
    /// Kinds printed with their source text in tree dumps.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::QualifiedIdentifier
                | Self::Literal
                | Self::Operator
                | Self::Modifier
                | Self::Annotation
                | Self::AnnotationArguments
                | Self::Wildcard
                | Self::BindVariable
                | Self::InquiryDirective
                | Self::TemplateText
                | Self::WindowFrame
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! fields {
    ($($name:ident => $text:literal),* $(,)?) => {
        /// Semantic field names. A node may hold several children under one field.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Field {
            $($name,)*
        }

        impl Field {
            pub const ALL: &'static [Field] = &[$(Field::$name,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$name => $text,)*
                }
            }

            pub fn from_name(name: &str) -> Option<Field> {
                match name {
                    $($text => Some(Self::$name),)*
                    _ => None,
                }
            }
        }
    };
}

fields! {
    Alias => "alias",
    Annotations => "annotations",
    ApplyType => "apply_type",
    Arguments => "arguments",
    Attribute => "attribute",
    Body => "body",
    Call => "call",
    BulkCollect => "bulk_collect",
    Clauses => "clauses",
    Collection => "collection",
    Columns => "columns",
    Condition => "condition",
    ConnectBy => "connect_by",
    Constraint => "constraint",
    Ctes => "ctes",
    Cursor => "cursor",
    Declarations => "declarations",
    DefaultValue => "default_value",
    Direction => "direction",
    ElementType => "element_type",
    ElseClause => "else_clause",
    ElsifClauses => "elsif_clauses",
    EndName => "end_name",
    Escape => "escape",
    ExceptionHandler => "exception_handler",
    Exceptions => "exceptions",
    Fields => "fields",
    ForUpdate => "for_update",
    From => "from",
    Function => "function",
    GroupBy => "group_by",
    Having => "having",
    Hierarchical => "hierarchical",
    High => "high",
    IndexType => "index_type",
    Into => "into",
    Items => "items",
    JoinType => "join_type",
    Label => "label",
    Left => "left",
    Limit => "limit",
    List => "list",
    LoopVariable => "loop_variable",
    Low => "low",
    Member => "member",
    Message => "message",
    Modifiers => "modifiers",
    Name => "name",
    Nulls => "nulls",
    Object => "object",
    Operand => "operand",
    Operator => "operator",
    OrderBy => "order_by",
    Over => "over",
    Parameters => "parameters",
    Part => "part",
    PartitionBy => "partition_by",
    Query => "query",
    Quantifier => "quantifier",
    ReturnType => "return_type",
    Returning => "returning",
    Right => "right",
    Sections => "sections",
    Selector => "selector",
    SelectList => "select_list",
    Set => "set",
    Size => "size",
    Source => "source",
    StartWith => "start_with",
    Table => "table",
    Target => "target",
    Text => "text",
    ThenBody => "then_body",
    Type => "type",
    Using => "using",
    Value => "value",
    Values => "values",
    Wait => "wait",
    Where => "where",
    WhenClauses => "when_clauses",
    WithinGroup => "within_group",
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(u32);

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Node(NodeId),
    Token(TokenId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    kind: NodeKind,
    span: TextRange,
    children: Vec<Element>,
    fields: Vec<(Field, NodeId)>,
}

/// Parsed tree. Owns a copy of the source so node text is always available.
#[derive(Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<NodeData>,
    tokens: Vec<LexToken>,
    trivia: Vec<Trivia>,
    root: NodeId,
}

impl SyntaxTree {
    pub fn root(&self) -> Node<'_> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { tree: self, id }
    }

    pub fn token(&self, id: TokenId) -> Token<'_> {
        Token { tree: self, id }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.source)
    }

    /// Concatenates every token reachable from the root, with its leading trivia.
    ///
    /// Equals the parsed input; anything else means the parser dropped or duplicated input.
    pub fn reconstruct(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        for token in self.root().tokens() {
            for trivia in token.leading_trivia() {
                out.push_str(trivia.1);
            }
            out.push_str(token.text());
        }
        out
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("nodes", &self.nodes.len())
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

/// Cursor over a node. Cheap to copy.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

/// Cursor over a token.
#[derive(Clone, Copy)]
pub struct Token<'t> {
    tree: &'t SyntaxTree,
    id: TokenId,
}

#[derive(Clone, Copy, Debug)]
pub enum SyntaxElement<'t> {
    Node(Node<'t>),
    Token(Token<'t>),
}

impl<'t> SyntaxElement<'t> {
    pub fn span(&self) -> TextRange {
        match self {
            Self::Node(node) => node.span(),
            Self::Token(token) => token.span(),
        }
    }

    pub fn as_node(&self) -> Option<Node<'t>> {
        match self {
            Self::Node(node) => Some(*node),
            Self::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<Token<'t>> {
        match self {
            Self::Node(_) => None,
            Self::Token(token) => Some(*token),
        }
    }
}

impl<'t> Node<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> NodeKind {
        self.tree.data(self.id).kind
    }

    pub fn span(&self) -> TextRange {
        self.tree.data(self.id).span
    }

    /// Exact source text covered by this node, without leading trivia.
    pub fn text(&self) -> &'t str {
        &self.tree.source[std::ops::Range::<usize>::from(self.span())]
    }

    pub fn line_col(&self, index: &LineIndex) -> LineCol {
        index.line_col(&self.tree.source, self.span().start())
    }

    /// Nodes and tokens in source order.
    pub fn children(&self) -> impl Iterator<Item = SyntaxElement<'t>> + use<'t> {
        let tree = self.tree;
        tree.data(self.id).children.iter().map(move |&el| match el {
            Element::Node(id) => SyntaxElement::Node(tree.node(id)),
            Element::Token(id) => SyntaxElement::Token(tree.token(id)),
        })
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.children().filter_map(|el| el.as_node())
    }

    pub fn child_tokens(&self) -> impl Iterator<Item = Token<'t>> + use<'t> {
        self.children().filter_map(|el| el.as_token())
    }

    /// All children stored under `field`, in source order.
    pub fn field(&self, field: Field) -> impl Iterator<Item = Node<'t>> + use<'t> {
        let tree = self.tree;
        tree.data(self.id)
            .fields
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(move |&(_, id)| tree.node(id))
    }

    pub fn first_field(&self, field: Field) -> Option<Node<'t>> {
        self.field(field).next()
    }

    /// Field lookup by its textual name (`"name"`, `"body"`, ...). Unknown names yield nothing.
    pub fn field_by_name(&self, name: &str) -> impl Iterator<Item = Node<'t>> + use<'t> {
        let tree = self.tree;
        let field = Field::from_name(name);
        tree.data(self.id)
            .fields
            .iter()
            .filter(move |(f, _)| Some(*f) == field)
            .map(move |&(_, id)| tree.node(id))
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.first_field(field).is_some()
    }

    /// `(field, child)` pairs in source order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, Node<'t>)> + use<'t> {
        let tree = self.tree;
        tree.data(self.id)
            .fields
            .iter()
            .map(move |&(f, id)| (f, tree.node(id)))
    }

    /// Field under which `child` is stored in this node, if any.
    pub fn field_of(&self, child: NodeId) -> Option<Field> {
        self.tree
            .data(self.id)
            .fields
            .iter()
            .find(|(_, id)| *id == child)
            .map(|&(f, _)| f)
    }

    /// Pre-order traversal including `self`.
    pub fn descendants(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        let tree = self.tree;
        let mut stack = vec![self.id];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let data = tree.data(id);
            stack.extend(data.children.iter().rev().filter_map(|el| match el {
                Element::Node(child) => Some(*child),
                Element::Token(_) => None,
            }));
            Some(tree.node(id))
        })
    }

    /// Every token under this node, in source order.
    pub fn tokens(&self) -> impl Iterator<Item = Token<'t>> + use<'t> {
        let tree = self.tree;
        let mut stack = vec![Element::Node(self.id)];
        std::iter::from_fn(move || {
            loop {
                match stack.pop()? {
                    Element::Token(id) => return Some(tree.token(id)),
                    Element::Node(id) => stack.extend(tree.data(id).children.iter().rev()),
                }
            }
        })
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.kind(), self.span())
    }
}

impl<'t> Token<'t> {
    pub fn id(&self) -> TokenId {
        self.id
    }

    fn data(&self) -> &'t LexToken {
        &self.tree.tokens[self.id.index()]
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn span(&self) -> TextRange {
        self.data().span
    }

    pub fn text(&self) -> &'t str {
        &self.tree.source[std::ops::Range::<usize>::from(self.span())]
    }

    /// Whitespace and comments directly before this token.
    pub fn leading_trivia(&self) -> impl Iterator<Item = (SyntaxKind, &'t str)> + use<'t> {
        let tree = self.tree;
        tree.trivia[self.data().trivia_range()]
            .iter()
            .map(move |t| (t.kind, &tree.source[std::ops::Range::<usize>::from(t.span)]))
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.span(), self.text())
    }
}

/// JSON shape: `{"kind", "start", "end", "text"?, "children": [{"field"?, ...}]}`.
/// Tokens are omitted; leaf nodes carry their text instead.
impl Serialize for Node<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_node(*self, None, serializer)
    }
}

struct FieldedNode<'t> {
    node: Node<'t>,
    field: Option<Field>,
}

impl Serialize for FieldedNode<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_node(self.node, self.field, serializer)
    }
}

struct Children<'t>(Node<'t>);

impl Serialize for Children<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let parent = self.0;
        let mut seq = serializer.serialize_seq(None)?;
        for child in parent.child_nodes() {
            seq.serialize_element(&FieldedNode {
                node: child,
                field: parent.field_of(child.id()),
            })?;
        }
        seq.end()
    }
}

fn serialize_node<S: serde::Serializer>(
    node: Node<'_>,
    field: Option<Field>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    if let Some(field) = field {
        map.serialize_entry("field", field.as_str())?;
    }
    map.serialize_entry("kind", node.kind().as_str())?;
    map.serialize_entry("start", &u32::from(node.span().start()))?;
    map.serialize_entry("end", &u32::from(node.span().end()))?;
    if node.kind().is_leaf() {
        map.serialize_entry("text", node.text())?;
    } else {
        map.serialize_entry("children", &Children(node))?;
    }
    map.end()
}

/// Position in the builder to wrap retroactively with [`TreeBuilder::start_node_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    depth: usize,
    child_count: usize,
}

#[derive(Debug)]
struct OpenNode {
    kind: NodeKind,
    children: Vec<Element>,
    fields: Vec<(Field, NodeId)>,
}

/// Bottom-up builder for [`SyntaxTree`].
#[derive(Debug)]
pub(crate) struct TreeBuilder {
    nodes: Vec<NodeData>,
    tokens: Vec<LexToken>,
    stack: Vec<OpenNode>,
    /// End of the last token added; empty nodes are placed here.
    offset: TextSize,
}

impl TreeBuilder {
    pub(crate) fn new(tokens: Vec<LexToken>) -> Self {
        Self {
            nodes: Vec::new(),
            tokens,
            stack: Vec::new(),
            offset: TextSize::default(),
        }
    }

    pub(crate) fn start_node(&mut self, kind: NodeKind) {
        self.stack.push(OpenNode {
            kind,
            children: Vec::new(),
            fields: Vec::new(),
        });
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            depth: self.stack.len(),
            child_count: self.stack.last().map_or(0, |n| n.children.len()),
        }
    }

    /// Opens a node that adopts every child added since `checkpoint`, with their fields.
    pub(crate) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        assert_eq!(
            checkpoint.depth,
            self.stack.len(),
            "checkpoint used at a different nesting depth"
        );
        let parent = self
            .stack
            .last_mut()
            .expect("start_node_at requires an open parent");
        let children = parent.children.split_off(checkpoint.child_count);
        let (moved, kept): (Vec<_>, Vec<_>) = parent
            .fields
            .drain(..)
            .partition(|(_, id)| children.contains(&Element::Node(*id)));
        parent.fields = kept;
        self.stack.push(OpenNode {
            kind,
            children,
            fields: moved,
        });
    }

    /// Number of direct children of the open node.
    pub(crate) fn child_count(&self) -> usize {
        self.stack.last().map_or(0, |n| n.children.len())
    }

    /// Tags every child node added to the open node since `mark` with `field`.
    pub(crate) fn tag_since(&mut self, mark: usize, field: Field) {
        let Some(open) = self.stack.last_mut() else {
            return;
        };
        for el in &open.children[mark.min(open.children.len())..] {
            if let Element::Node(id) = *el
                && self.nodes[id.index()].kind != NodeKind::Error
                && !open.fields.iter().any(|(_, tagged)| *tagged == id)
            {
                open.fields.push((field, id));
            }
        }
    }

    /// Reopens the node finished last so more children can be appended to it.
    ///
    /// Lets a statement-level SQL node take its `;` after the query parser closed it.
    pub(crate) fn reopen_last(&mut self) -> bool {
        let Some(parent) = self.stack.last_mut() else {
            return false;
        };
        let Some(&Element::Node(id)) = parent.children.last() else {
            return false;
        };
        if id.index() + 1 != self.nodes.len() {
            return false;
        }
        parent.children.pop();
        parent.fields.retain(|(_, tagged)| *tagged != id);
        let Some(data) = self.nodes.pop() else {
            return false;
        };
        self.stack.push(OpenNode {
            kind: data.kind,
            children: data.children,
            fields: data.fields,
        });
        true
    }

    /// Changes the kind of the open node (`SelectStmt` becomes `SelectIntoStmt` on `INTO`).
    pub(crate) fn retag(&mut self, kind: NodeKind) {
        if let Some(open) = self.stack.last_mut() {
            open.kind = kind;
        }
    }

    pub(crate) fn token(&mut self, index: usize) {
        self.offset = self.tokens[index].span.end();
        if let Some(open) = self.stack.last_mut() {
            open.children.push(Element::Token(TokenId(index as u32)));
        }
    }

    pub(crate) fn finish_node(&mut self) -> NodeId {
        let open = self
            .stack
            .pop()
            .expect("finish_node without a matching start_node");
        let span = self.span_of(&open.children);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind: open.kind,
            span,
            children: open.children,
            fields: open.fields,
        });
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Element::Node(id));
        }
        id
    }

    /// Covers the non-empty children; empty nodes only count when nothing else does.
    fn span_of(&self, children: &[Element]) -> TextRange {
        let spans = children.iter().map(|el| match *el {
            Element::Node(id) => self.nodes[id.index()].span,
            Element::Token(id) => self.tokens[id.index()].span,
        });
        spans
            .clone()
            .filter(|s| !s.is_empty())
            .reduce(TextRange::cover)
            .or_else(|| spans.reduce(TextRange::cover))
            .unwrap_or_else(|| TextRange::empty(self.offset))
    }

    pub(crate) fn finish(self, source: &str, trivia: Vec<Trivia>, root: NodeId) -> SyntaxTree {
        debug_assert!(self.stack.is_empty(), "unfinished nodes: {:?}", self.stack);
        SyntaxTree {
            source: source.to_string(),
            nodes: self.nodes,
            tokens: self.tokens,
            trivia,
            root,
        }
    }
}
