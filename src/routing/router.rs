use std::collections::HashMap;
use std::future::Future;

use tracing::debug;

use crate::http::request::{Method, Request};
use crate::http::writer::ResponseWriter;
use crate::routing::RouteError;
use crate::routing::handler::{BoxedHandler, Handler};
use crate::routing::pattern::{Pattern, Segment, split_path};

const ROOT: usize = 0;

/// One trie position. Children are indices into the arena.
#[derive(Default)]
struct Node {
    literals: HashMap<String, usize>,
    param: Option<ParamEdge>,
    route: Option<Route>,
}

struct ParamEdge {
    name: String,
    child: usize,
}

/// Leaf payload. Only ever created together with its first handler.
struct Route {
    params: Vec<String>,
    by_method: HashMap<Method, BoxedHandler>,
    catch_all: Option<BoxedHandler>,
}

impl Route {
    fn new(params: Vec<String>) -> Self {
        Self {
            params,
            by_method: HashMap::new(),
            catch_all: None,
        }
    }

    fn has(&self, method: Option<Method>) -> bool {
        match method {
            Some(m) => self.by_method.contains_key(&m),
            None => self.catch_all.is_some(),
        }
    }

    fn attach(&mut self, method: Option<Method>, handler: BoxedHandler) {
        match method {
            Some(m) => {
                self.by_method.insert(m, handler);
            }
            None => self.catch_all = Some(handler),
        }
    }

    fn handler_for(&self, method: Method) -> Option<&dyn Handler> {
        self.by_method
            .get(&method)
            .or(self.catch_all.as_ref())
            .map(|h| &**h)
    }
}

/// A successful lookup.
pub struct Match<'r> {
    pub handler: &'r dyn Handler,
    /// Captured segments keyed by the names declared in the matched pattern.
    pub path_variables: HashMap<String, String>,
}

/// Mutable route table used during start-up.
pub struct RouterBuilder {
    nodes: Vec<Node>,
    routes: usize,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            routes: 0,
        }
    }

    /// Registers `handler` under `pattern`.
    ///
    /// `"METHOD /path"` binds one method, `"/path"` binds a catch-all that
    /// answers every method without a dedicated handler. Segments written as
    /// `{name}` capture whatever the request has in that position.
    pub fn register<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(Request, ResponseWriter) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<ResponseWriter>> + Send + 'static,
    {
        self.register_boxed(pattern, Box::new(handler))
    }

    pub fn register_boxed(
        &mut self,
        pattern: &str,
        handler: BoxedHandler,
    ) -> Result<&mut Self, RouteError> {
        let parsed = Pattern::parse(pattern)?;
        self.check(pattern, &parsed)?;

        let mut node = ROOT;
        for segment in &parsed.segments {
            node = match segment {
                Segment::Literal(lit) => match self.nodes[node].literals.get(lit) {
                    Some(&child) => child,
                    None => {
                        let child = self.push_node();
                        self.nodes[node].literals.insert(lit.clone(), child);
                        child
                    }
                },
                Segment::Param(name) => match &self.nodes[node].param {
                    Some(edge) => edge.child,
                    None => {
                        let child = self.push_node();
                        self.nodes[node].param = Some(ParamEdge {
                            name: name.clone(),
                            child,
                        });
                        child
                    }
                },
            };
        }

        let leaf = &mut self.nodes[node];
        if leaf.route.is_none() {
            self.routes += 1;
        }
        leaf.route
            .get_or_insert_with(|| Route::new(parsed.param_names()))
            .attach(parsed.method, handler);

        debug!(pattern, "registered route");
        Ok(self)
    }

    /// Walks the existing trie read-only and reports anything that would make
    /// the insertion inconsistent, so a failed registration leaves no trace.
    fn check(&self, pattern: &str, parsed: &Pattern) -> Result<(), RouteError> {
        let mut node = ROOT;
        for segment in &parsed.segments {
            let next = match segment {
                Segment::Literal(lit) => self.nodes[node].literals.get(lit).copied(),
                Segment::Param(name) => match &self.nodes[node].param {
                    Some(edge) if edge.name != *name => {
                        return Err(RouteError::ParamConflict {
                            pattern: pattern.to_string(),
                            existing: edge.name.clone(),
                            requested: name.clone(),
                        });
                    }
                    Some(edge) => Some(edge.child),
                    None => None,
                },
            };
            match next {
                Some(child) => node = child,
                // the rest of the pattern is new
                None => return Ok(()),
            }
        }

        match &self.nodes[node].route {
            Some(route) if route.has(parsed.method) => Err(RouteError::Duplicate {
                pattern: pattern.to_string(),
                method: parsed.method,
            }),
            _ => Ok(()),
        }
    }

    fn push_node(&mut self) -> usize {
        self.nodes.push(Node::default());
        self.nodes.len() - 1
    }

    /// Freezes the table.
    pub fn build(self) -> Router {
        Router {
            nodes: self.nodes,
            routes: self.routes,
        }
    }
}

/// Immutable route table shared by every connection.
pub struct Router {
    nodes: Vec<Node>,
    routes: usize,
}

impl Router {
    /// Number of distinct paths carrying at least one handler.
    pub fn route_count(&self) -> usize {
        self.routes
    }

    /// Looks up the handler for `method` on `path`.
    ///
    /// Each segment follows the literal edge when there is one and the
    /// parameter edge otherwise; there is no backtracking. The path is
    /// compared raw: no percent-decoding, and a query string is part of the
    /// last segment.
    pub fn find(&self, method: Method, path: &str) -> Option<Match<'_>> {
        let mut node = &self.nodes[ROOT];
        let mut captures = Vec::new();

        for segment in split_path(path) {
            let next = match node.literals.get(segment) {
                Some(&child) => child,
                None => {
                    let edge = node.param.as_ref()?;
                    captures.push(segment);
                    edge.child
                }
            };
            node = &self.nodes[next];
        }

        let route = node.route.as_ref()?;
        let handler = route.handler_for(method)?;

        let path_variables = route
            .params
            .iter()
            .cloned()
            .zip(captures.into_iter().map(str::to_string))
            .collect();

        Some(Match {
            handler,
            path_variables,
        })
    }
}
