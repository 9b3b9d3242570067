//! Provide/inject scoping for theme contexts
//!
//! A root scope provides the application's manager. Descendant scopes either
//! inherit the nearest provided manager or provide their own for an isolated
//! region (a modal with independent theming, for example).

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use crate::manager::ThemeContextManager;

struct ScopeNode {
    label: String,
    parent: Option<ThemeScope>,
    manager: ThemeContextManager,
    /// The manager was provided here rather than inherited
    owned: bool,
    children: Mutex<Vec<Weak<ScopeNode>>>,
}

/// A node in the scope tree. Cloning yields another handle to the same scope.
#[derive(Clone)]
pub struct ThemeScope {
    node: Arc<ScopeNode>,
}

impl std::fmt::Debug for ThemeScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeScope")
            .field("label", &self.node.label)
            .field("isolated", &self.is_isolated())
            .field("depth", &self.depth())
            .finish()
    }
}

impl ThemeScope {
    /// Application root providing `manager`
    pub fn root(manager: ThemeContextManager) -> Self {
        Self::node("root", None, manager, true)
    }

    fn node(
        label: &str,
        parent: Option<ThemeScope>,
        manager: ThemeContextManager,
        owned: bool,
    ) -> Self {
        let scope = Self {
            node: Arc::new(ScopeNode {
                label: label.to_string(),
                parent,
                manager,
                owned,
                children: Mutex::new(Vec::new()),
            }),
        };
        if let Some(parent) = &scope.node.parent {
            let mut children = parent.node.children.lock();
            children.retain(|child| child.strong_count() > 0);
            children.push(Arc::downgrade(&scope.node));
        }
        scope
    }

    /// Descendant that inherits the nearest provided manager
    pub fn child(&self, label: &str) -> Self {
        Self::node(label, Some(self.clone()), self.inject(), false)
    }

    /// Descendant region that provides its own manager
    pub fn provide(&self, label: &str, manager: ThemeContextManager) -> Self {
        debug!(scope = label, parent = %self.node.label, "Providing isolated theme context");
        Self::node(label, Some(self.clone()), manager, true)
    }

    /// Nearest manager provided at this scope or above
    pub fn inject(&self) -> ThemeContextManager {
        self.node.manager.clone()
    }

    pub fn label(&self) -> &str {
        &self.node.label
    }

    /// Whether this scope provides its own manager
    pub fn is_isolated(&self) -> bool {
        self.node.owned
    }

    pub fn parent(&self) -> Option<&ThemeScope> {
        self.node.parent.as_ref()
    }

    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self;
        while let Some(parent) = &scope.node.parent {
            depth += 1;
            scope = parent;
        }
        depth
    }

    /// Tear down this scope and its live descendants.
    ///
    /// Disposes only the managers provided within the torn-down subtree;
    /// an inherited manager belongs to an ancestor and is left alone.
    pub fn dispose(&self) {
        let children: Vec<ThemeScope> = self
            .node
            .children
            .lock()
            .drain(..)
            .filter_map(|child| child.upgrade())
            .map(|node| ThemeScope { node })
            .collect();

        for child in children {
            child.dispose();
        }

        if self.node.owned {
            self.node.manager.dispose();
        }
        debug!(scope = %self.node.label, "Theme scope disposed");
    }
}
