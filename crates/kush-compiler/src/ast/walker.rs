//! Generic depth-first traversal of an [`Ast`] on behalf of an [`AstListener`].

use super::{dispatch_enter, dispatch_exit, Ast, AstListener, Context, NodeId};
use crate::{STACK_RED_ZONE, STACK_SEGMENT};

/// Which children of the current node the walker descends into.
///
/// Reset to [`WalkerState::VisitChildren`] before each node; a listener
/// changes it from an enter hook to prune the traversal of that node only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkerState {
    #[default]
    VisitChildren,
    SkipChildren,
    /// Children at 0-based positions 0, 2, 4, ...
    VisitEvenChildren,
    /// Children at 0-based positions 1, 3, 5, ...
    VisitOddChildren,
    VisitFirstChild,
    VisitLastChild,
    /// First and last child (once when there is only one).
    VisitExtremeChildren,
}

impl WalkerState {
    /// Select the children to visit out of the full ordered list.
    pub fn select(self, children: &[NodeId]) -> Vec<NodeId> {
        match self {
            WalkerState::VisitChildren => children.to_vec(),
            WalkerState::SkipChildren => Vec::new(),
            WalkerState::VisitEvenChildren => children.iter().step_by(2).copied().collect(),
            WalkerState::VisitOddChildren => children.iter().skip(1).step_by(2).copied().collect(),
            WalkerState::VisitFirstChild => children.first().copied().into_iter().collect(),
            WalkerState::VisitLastChild => children.last().copied().into_iter().collect(),
            WalkerState::VisitExtremeChildren => match children {
                [] => Vec::new(),
                [only] => vec![*only],
                [first, .., last] => vec![*first, *last],
            },
        }
    }
}

/// Walks one [`Ast`].
pub struct AstWalker<'a> {
    ast: &'a Ast,
    state: WalkerState,
}

impl<'a> AstWalker<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self {
            ast,
            state: WalkerState::VisitChildren,
        }
    }

    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub fn state(&self) -> WalkerState {
        self.state
    }

    /// Set the child selection for the node currently being entered.
    pub fn set_state(&mut self, state: WalkerState) {
        self.state = state;
    }

    /// Walk the subtree rooted at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not belong to the walked tree.
    pub fn walk<L: AstListener + ?Sized>(&mut self, listener: &mut L, node: NodeId) {
        let ast = self.ast;
        let context = &ast.node(node).context;

        self.state = WalkerState::VisitChildren;
        listener.on_enter_every_rule(self, node);

        if let Context::Terminal(token) = context {
            listener.on_visit_terminal(self, node, token);
            return;
        }

        dispatch_enter(listener, self, node, context);

        let children = self.state.select(&context.children());
        for child in children {
            stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.walk(listener, child));
        }

        dispatch_exit(listener, self, node, context);
        listener.on_exit_every_rule(self, node);
    }
}
