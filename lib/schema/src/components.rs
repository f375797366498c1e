use crate::schema::{ObjectLabel, Schema};
use itertools::Itertools;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// A maximal set of triples of a [`Schema`] whose nodes are connected.
///
/// The body holds one line per triple (`    ?v0 <p> ?v1 .`), sorted and newline terminated.
/// The complexity lists, for every subject of the component, the number of its triples, in
/// ascending order. It sums up to the number of lines of the body.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConnectedComponent {
    pub body: String,
    pub complexity: Vec<i32>,
}

impl ConnectedComponent {
    /// The complexity joined with `-`, e.g. `2-3`.
    pub fn signature(&self) -> String {
        self.complexity.iter().join("-")
    }

    /// A component made of a single triple.
    pub fn is_trivial(&self) -> bool {
        self.complexity == [1]
    }

    /// Renders the component as a query that selects its pattern.
    pub fn to_query(&self) -> String {
        format!("select * {{\n{}}}\n", self.body)
    }

    /// The triple lines of the body.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.body.lines()
    }
}

impl fmt::Display for ConnectedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# complexity: [{}]", self.complexity.iter().join(", "))?;
        f.write_str(&self.body)
    }
}

/// Splits `schema` into its connected components.
///
/// Two triples are connected if they share a subject or object label. Verbatim objects only
/// connect triples if they are variables (e.g. the class of `?s a ?class`). The components are
/// sorted by body, so the result only depends on the recorded triples.
pub fn connected_components(schema: &Schema) -> Vec<ConnectedComponent> {
    let mut nodes = Nodes::new(schema.label_count());
    let triples = schema
        .triples()
        .map(|(subject, predicate, object)| {
            let subject_node = Nodes::canonical(subject.index());
            let object_node = match object {
                ObjectLabel::Canonical(label) => Some(Nodes::canonical(label.index())),
                ObjectLabel::Verbatim(text) if text.starts_with('?') => Some(nodes.verbatim(text)),
                ObjectLabel::Verbatim(_) => None,
            };
            if let Some(object_node) = object_node {
                nodes.union(subject_node, object_node);
            }
            (subject_node, format!("    {subject} {predicate} {object} ."))
        })
        .collect::<Vec<_>>();

    let mut groups = BTreeMap::<usize, Vec<String>>::new();
    for (subject_node, line) in triples {
        groups.entry(nodes.find(subject_node)).or_default().push(line);
    }

    let mut components = groups
        .into_values()
        .map(|mut lines| {
            lines.sort_unstable();
            let body = lines.iter().map(|line| format!("{line}\n")).collect::<String>();
            let complexity = complexity(&body);
            ConnectedComponent { body, complexity }
        })
        .collect::<Vec<_>>();
    components.sort_unstable();
    components
}

/// Counts the runs of lines with the same subject in a sorted body.
fn complexity(body: &str) -> Vec<i32> {
    let mut complexity = SUBJECT
        .captures_iter(body)
        .filter_map(|captures| captures.get(1))
        .map(|subject| subject.as_str())
        .dedup_with_count()
        .map(|(count, _)| i32::try_from(count).unwrap_or(i32::MAX))
        .collect::<Vec<_>>();
    complexity.sort_unstable();
    complexity
}

/// The subject of a body line.
#[allow(clippy::expect_used, reason = "Indicates programming error")]
static SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^    (\?[^ ]+)").expect("valid subject pattern"));

/// A union-find over the nodes of a schema: canonical labels first, then variables kept verbatim.
struct Nodes<'a> {
    parents: Vec<usize>,
    verbatim: FxHashMap<&'a str, usize>,
}

impl<'a> Nodes<'a> {
    fn new(canonical: usize) -> Self {
        Self {
            parents: (0..canonical).collect(),
            verbatim: FxHashMap::default(),
        }
    }

    fn canonical(index: u32) -> usize {
        usize::try_from(index).unwrap_or(usize::MAX)
    }

    fn verbatim(&mut self, text: &'a str) -> usize {
        let next = self.parents.len();
        let node = *self.verbatim.entry(text).or_insert(next);
        if node == next {
            self.parents.push(next);
        }
        node
    }

    fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.parents[root] != root {
            root = self.parents[root];
        }
        let mut current = node;
        while self.parents[current] != root {
            let parent = self.parents[current];
            self.parents[current] = root;
            current = parent;
        }
        root
    }

    fn union(&mut self, left: usize, right: usize) {
        let left = self.find(left);
        let right = self.find(right);
        if left != right {
            let (root, child) = if left < right { (left, right) } else { (right, left) };
            self.parents[child] = root;
        }
    }
}
