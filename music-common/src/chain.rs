//! Error chain for request diagnostics
//!
//! Every layer that handles an error wraps it at a [`Function`] site. The
//! site records the package, component and function it belongs to, a set of
//! ordered tags, and a human context string. Wrapping an existing [`Chain`]
//! links to it, so the outermost chain can render the whole path an error
//! travelled:
//!
//! ```text
//! ERROR <origin> | CONTEXT <ctx> <- <ctx> | TAGS: k->v | STACK: pkg.comp.fn <- pkg.comp.fn
//! ```
//!
//! Only the *external* message is meant for API callers. It is set by the
//! boundary constructors ([`Function::not_found`], [`Function::db`],
//! [`Function::unknown`], [`Function::json`], [`Function::invalid`]); the rest
//! of the chain is for the logs.

use std::error::Error as StdError;
use std::fmt;

/// Boxed error accepted as the cause of a chain
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// External message used when no wrap in the chain set one
pub const DEFAULT_EXTERNAL: &str = "unknown error";

/// Error handler scoped to a package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Package {
    name: &'static str,
}

impl Package {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Narrow the handler to a component (struct) of this package
    pub const fn component(&self, name: &'static str) -> Component {
        Component {
            package: self.name,
            name,
        }
    }
}

/// Error handler scoped to a component of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    package: &'static str,
    name: &'static str,
}

impl Component {
    /// Start a wrap-site for a function of this component
    pub fn function(&self, name: &'static str) -> Function {
        Function {
            site: Site {
                package: self.package,
                component: self.name,
                function: name,
            },
            tags: Vec::new(),
        }
    }
}

/// Identity of a wrap-site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    pub package: &'static str,
    pub component: &'static str,
    pub function: &'static str,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.package, self.component, self.function)
    }
}

/// Wrap-site inside a single function
#[derive(Debug, Clone)]
pub struct Function {
    site: Site,
    tags: Vec<(String, String)>,
}

impl Function {
    /// Attach a tag to every chain built from this site
    pub fn tag(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.tags.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.tags.push((key, value)),
        }
        self
    }

    pub fn site(&self) -> Site {
        self.site
    }

    fn link(&self, cause: BoxError, context: String, external: Option<&'static str>) -> Chain {
        let cause = match cause.downcast::<Chain>() {
            Ok(chain) => Cause::Chain(chain),
            Err(other) => Cause::Error(other),
        };
        Chain {
            cause,
            external,
            context,
            site: self.site,
            tags: self.tags.clone(),
        }
    }

    /// New chain whose root cause is `context` itself
    pub fn new(&self, context: impl Into<String>) -> Chain {
        let context = context.into();
        self.link(context.clone().into(), context, None)
    }

    /// Wrap an error with this site and a context
    pub fn wrap(&self, err: impl Into<BoxError>, context: impl Into<String>) -> Chain {
        self.link(err.into(), context.into(), None)
    }

    /// Blame a JSON payload received from the caller
    pub fn json(&self, err: impl Into<BoxError>, context: impl Into<String>) -> Chain {
        self.link(err.into(), context.into(), Some("invalid json"))
    }

    /// The requested resource does not exist
    pub fn not_found(&self) -> Chain {
        self.link(Box::new(self.new("not found")), String::new(), Some("resource not found"))
    }

    /// Blame the database
    pub fn db(&self, err: impl Into<BoxError>) -> Chain {
        self.link(err.into(), String::new(), Some("problem in database"))
    }

    /// Data sent by the caller is not acceptable
    pub fn invalid(&self, context: impl Into<String>) -> Chain {
        let context = context.into();
        self.link(context.clone().into(), context, Some("invalid data sent"))
    }

    /// Tell the caller the problem is unknown
    pub fn unknown(&self, err: impl Into<BoxError>) -> Chain {
        self.link(err.into(), String::new(), Some(DEFAULT_EXTERNAL))
    }

    /// Unknown problem with no underlying error to wrap
    pub fn new_unknown(&self) -> Chain {
        self.unknown(self.new("unknown error"))
    }
}

#[derive(Debug)]
enum Cause {
    Chain(Box<Chain>),
    Error(BoxError),
}

/// One wrap of an error, linked to the error it wraps
#[derive(Debug)]
pub struct Chain {
    cause: Cause,
    external: Option<&'static str>,
    context: String,
    site: Site,
    tags: Vec<(String, String)>,
}

impl Chain {
    /// Iterate the wraps from this one (outermost) to the innermost
    pub fn links(&self) -> impl Iterator<Item = &Chain> {
        std::iter::successors(Some(self), |chain| match &chain.cause {
            Cause::Chain(inner) => Some(inner.as_ref()),
            Cause::Error(_) => None,
        })
    }

    pub fn site(&self) -> Site {
        self.site
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Message shown to API callers
    ///
    /// The outermost external message wins; inner ones are a fallback.
    pub fn external(&self) -> &'static str {
        self.links()
            .find_map(|chain| chain.external)
            .unwrap_or(DEFAULT_EXTERNAL)
    }

    /// Message of the error at the root of the chain
    pub fn origin(&self) -> String {
        self.links()
            .find_map(|chain| match &chain.cause {
                Cause::Error(err) => Some(err.to_string()),
                Cause::Chain(_) => None,
            })
            .unwrap_or_else(|| "nil".to_string())
    }

    /// Tags of every wrap flattened into one ordered list
    ///
    /// A key keeps the position where it first appears, walking from the
    /// outermost wrap inward, and takes the value set by the deepest wrap.
    pub fn tags(&self) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = Vec::new();
        for chain in self.links() {
            for (key, value) in &chain.tags {
                match merged.iter_mut().find(|(k, _)| k == key) {
                    Some(slot) => slot.1 = value.clone(),
                    None => merged.push((key.clone(), value.clone())),
                }
            }
        }
        merged
    }

    /// Wrap-sites from the outermost to the innermost
    pub fn stack(&self) -> Vec<Site> {
        self.links().map(|chain| chain.site).collect()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = self
            .links()
            .map(|chain| chain.context.as_str())
            .collect::<Vec<_>>()
            .join(" <- ");
        let tags = self
            .tags()
            .iter()
            .map(|(key, value)| format!("{}->{}", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        let stack = self
            .links()
            .map(|chain| chain.site.to_string())
            .collect::<Vec<_>>()
            .join(" <- ");

        write!(
            f,
            "ERROR {} | CONTEXT {} | TAGS: {} | STACK: {}",
            self.origin(),
            context,
            tags,
            stack
        )
    }
}

impl StdError for Chain {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.cause {
            Cause::Chain(inner) => Some(inner.as_ref()),
            Cause::Error(err) => Some(err.as_ref()),
        }
    }
}
