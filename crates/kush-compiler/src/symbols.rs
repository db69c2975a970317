//! Symbol table implementation for name resolution
//!
//! Scopes and symbols live in two arenas addressed by [`ScopeId`] and
//! [`SymbolId`]. Each scope links to its parent; the chain always ends at the
//! compilation unit scope, which is allocated by [`SymbolTable::new`].

use crate::ast::NodeId;
use crate::token::{Token, TokenKind};
use rustc_hash::FxHashMap;
use std::fmt;
use std::ops::BitOr;

/// Scope identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Symbol identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Scope kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    CompilationUnit,
    Class,
    Function,
    Enumeration,
    /// Members of an annotation type
    Annotation,
    /// Statement suites, for loops, catch clauses
    Local,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeKind::CompilationUnit => "compilation unit",
            ScopeKind::Class => "class",
            ScopeKind::Function => "function",
            ScopeKind::Enumeration => "enumeration",
            ScopeKind::Annotation => "annotation",
            ScopeKind::Local => "local",
        };
        f.write_str(name)
    }
}

/// Scope in the scope tree
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// `None` only for the compilation unit scope
    pub parent: Option<ScopeId>,
    /// Symbol that introduced the scope (class, function, enumeration)
    pub owner: Option<SymbolId>,
    /// Node the scope was opened for
    pub node: Option<NodeId>,
    /// Set when a local scope has been left; lookups no longer see it.
    pub closed: bool,
    symbols: FxHashMap<String, SymbolId>,
    /// Definition order, for stable listings
    order: Vec<SymbolId>,
}

impl Scope {
    fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>, node: Option<NodeId>) -> Self {
        Scope {
            id,
            kind,
            parent,
            owner: None,
            node,
            closed: false,
            symbols: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Symbol defined directly in this scope.
    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    /// Symbols in definition order.
    pub fn symbols(&self) -> &[SymbolId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Declaration modifiers, as a bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const PUBLIC: Modifiers = Modifiers(1 << 0);
    pub const PRIVATE: Modifiers = Modifiers(1 << 1);
    pub const SECRET: Modifiers = Modifiers(1 << 2);
    pub const STATIC: Modifiers = Modifiers(1 << 3);
    pub const NATIVE: Modifiers = Modifiers(1 << 4);
    pub const ABSTRACT: Modifiers = Modifiers(1 << 5);

    const NAMES: [(Modifiers, &'static str); 6] = [
        (Modifiers::PUBLIC, "public"),
        (Modifiers::PRIVATE, "private"),
        (Modifiers::SECRET, "secret"),
        (Modifiers::STATIC, "static"),
        (Modifiers::NATIVE, "native"),
        (Modifiers::ABSTRACT, "abstract"),
    ];

    /// The modifier a keyword denotes, if any.
    pub fn from_token_kind(kind: TokenKind) -> Option<Modifiers> {
        match kind {
            TokenKind::Public => Some(Modifiers::PUBLIC),
            TokenKind::Private => Some(Modifiers::PRIVATE),
            TokenKind::Secret => Some(Modifiers::SECRET),
            TokenKind::Static => Some(Modifiers::STATIC),
            TokenKind::Native => Some(Modifiers::NATIVE),
            TokenKind::Abstract => Some(Modifiers::ABSTRACT),
            _ => None,
        }
    }

    pub fn insert(&mut self, other: Modifiers) {
        self.0 |= other.0;
    }

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    /// Keyword spellings of the modifiers present, in declaration order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.names().collect();
        f.write_str(&names.join(" "))
    }
}

/// Progress of superclass resolution for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionState {
    #[default]
    Pending,
    Resolved,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ClassSymbol {
    /// Member scope (kind Class, or Annotation for annotation types)
    pub scope: ScopeId,
    /// Resolved superclasses in `extends` order; Class symbols only
    pub superclasses: Vec<SymbolId>,
    /// External symbols named in `extends`, left for cross-unit linking
    pub imported_superclasses: Vec<SymbolId>,
    pub state: ResolutionState,
}

impl ClassSymbol {
    pub fn new(scope: ScopeId) -> Self {
        ClassSymbol {
            scope,
            superclasses: Vec::new(),
            imported_superclasses: Vec::new(),
            state: ResolutionState::Pending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub scope: ScopeId,
    /// Parameters before the variadic one
    pub parameter_count: usize,
    pub variadic: bool,
}

/// Category-specific symbol data
#[derive(Debug, Clone)]
pub enum SymbolKind {
    Class(ClassSymbol),
    Function(FunctionSymbol),
    /// `index` is assigned by code generation.
    Constant { index: Option<u32> },
    Variable,
    Enumerate { index: Option<u32> },
    Enumeration { scope: ScopeId },
    /// `loop_identifier` is bound when the labelled loop is entered.
    Label { loop_identifier: Option<u32> },
    /// Imported name, resolved when units are linked
    External { qualified_name: String },
}

impl SymbolKind {
    pub fn category(&self) -> SymbolCategory {
        match self {
            SymbolKind::Class(_) => SymbolCategory::Class,
            SymbolKind::Function(_) => SymbolCategory::Function,
            SymbolKind::Constant { .. } => SymbolCategory::Constant,
            SymbolKind::Variable => SymbolCategory::Variable,
            SymbolKind::Enumerate { .. } => SymbolCategory::Enumerate,
            SymbolKind::Enumeration { .. } => SymbolCategory::Enumeration,
            SymbolKind::Label { .. } => SymbolCategory::Label,
            SymbolKind::External { .. } => SymbolCategory::External,
        }
    }

    /// Nested member scope, for symbols that own one.
    pub fn scope(&self) -> Option<ScopeId> {
        match self {
            SymbolKind::Class(class) => Some(class.scope),
            SymbolKind::Function(function) => Some(function.scope),
            SymbolKind::Enumeration { scope } => Some(*scope),
            _ => None,
        }
    }
}

/// Plain tag of a [`SymbolKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolCategory {
    Class,
    Function,
    Constant,
    Variable,
    Enumerate,
    Enumeration,
    Label,
    External,
}

impl fmt::Display for SymbolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolCategory::Class => "class",
            SymbolCategory::Function => "function",
            SymbolCategory::Constant => "constant",
            SymbolCategory::Variable => "variable",
            SymbolCategory::Enumerate => "enumerate",
            SymbolCategory::Enumeration => "enumeration",
            SymbolCategory::Label => "label",
            SymbolCategory::External => "external",
        };
        f.write_str(name)
    }
}

/// Symbol information
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    /// Defining identifier
    pub token: Token,
    /// Scope where this symbol was defined
    pub scope: ScopeId,
    pub modifiers: Modifiers,
    pub kind: SymbolKind,
}

impl Symbol {
    /// A symbol named after its defining token. The scope is set by `define`.
    pub fn new(token: Token, kind: SymbolKind) -> Self {
        Symbol {
            name: token.text.clone(),
            token,
            scope: ScopeId(0),
            modifiers: Modifiers::NONE,
            kind,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn category(&self) -> SymbolCategory {
        self.kind.category()
    }

    pub fn as_class(&self) -> Option<&ClassSymbol> {
        match &self.kind {
            SymbolKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassSymbol> {
        match &mut self.kind {
            SymbolKind::Class(class) => Some(class),
            _ => None,
        }
    }
}

/// Error indicating a duplicate symbol definition
#[derive(Debug, Clone)]
pub struct DuplicateSymbolError {
    pub name: String,
    /// The definition that was kept
    pub original: SymbolId,
    /// Identifier of the rejected definition
    pub duplicate: Token,
}

/// Symbol table with scope tree
pub struct SymbolTable {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
    current_scope: ScopeId,
}

impl SymbolTable {
    /// Create a table holding only the compilation unit scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::new(ScopeId(0), ScopeKind::CompilationUnit, None, None)],
            symbols: Vec::new(),
            current_scope: ScopeId(0),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Open a child of the current scope and make it current.
    pub fn push_scope(&mut self, kind: ScopeKind, node: Option<NodeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, kind, Some(self.current_scope), node));
        self.current_scope = id;
        tracing::trace!(scope = id.0, %kind, "push scope");
        id
    }

    /// Return to the parent of the current scope, optionally closing it.
    ///
    /// Does nothing at the compilation unit scope.
    pub fn pop_scope(&mut self, close: bool) {
        let scope = &mut self.scopes[self.current_scope.index()];
        if let Some(parent) = scope.parent {
            scope.closed = close;
            tracing::trace!(scope = scope.id.0, closed = close, "pop scope");
            self.current_scope = parent;
        }
    }

    pub fn current_scope_id(&self) -> ScopeId {
        self.current_scope
    }

    pub fn current(&self) -> &Scope {
        &self.scopes[self.current_scope.index()]
    }

    pub fn set_owner(&mut self, scope: ScopeId, owner: SymbolId) {
        self.scopes[scope.index()].owner = Some(owner);
    }

    /// Define a symbol in the current scope.
    pub fn define(&mut self, symbol: Symbol) -> Result<SymbolId, DuplicateSymbolError> {
        self.define_in(self.current_scope, symbol)
    }

    /// Define a symbol in `scope`.
    ///
    /// A name already present keeps its first definition; nothing is allocated
    /// for the rejected one.
    pub fn define_in(
        &mut self,
        scope: ScopeId,
        mut symbol: Symbol,
    ) -> Result<SymbolId, DuplicateSymbolError> {
        if let Some(existing) = self.scopes[scope.index()].get(&symbol.name) {
            return Err(DuplicateSymbolError {
                name: symbol.name,
                original: existing,
                duplicate: symbol.token,
            });
        }

        let id = SymbolId(self.symbols.len() as u32);
        symbol.scope = scope;
        let target = &mut self.scopes[scope.index()];
        target.symbols.insert(symbol.name.clone(), id);
        target.order.push(id);
        self.symbols.push(symbol);
        Ok(id)
    }

    /// Resolve a name from `scope` outwards, skipping closed scopes.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.ancestors(scope)
            .filter(|s| !s.closed)
            .find_map(|s| s.get(name))
    }

    /// Resolve a name from `scope` outwards, closed scopes included.
    pub fn lookup_any(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.ancestors(scope).find_map(|s| s.get(name))
    }

    /// `scope` and its enclosing scopes, innermost first.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> {
        let mut next = Some(scope);
        std::iter::from_fn(move || {
            let scope = &self.scopes[next?.index()];
            next = scope.parent;
            Some(scope)
        })
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (SymbolId(i as u32), symbol))
    }

    /// Scopes whose parent is `scope`, in creation order.
    pub fn children(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> {
        self.scopes
            .iter()
            .filter(move |s| s.parent == Some(scope))
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("scopes", &self.scopes.len())
            .field("symbols", &self.symbols.len())
            .finish()
    }
}
