//! Node/edge view of the AST for visualization, and its Graphviz rendering.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::dsl::{Paper, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Paper,
    Question,
    SubQuestion,
    Option,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AstGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl AstGraph {
    /// Build the graph in document order: paper, then each question
    /// followed by its sub-questions and options.
    pub fn from_paper(paper: &Paper) -> Self {
        let mut graph = Self::default();
        graph.node("paper".to_string(), NodeKind::Paper, paper_label(paper));

        for q in &paper.questions {
            let qid = format!("q{}", q.number);
            graph.node(qid.clone(), NodeKind::Question, question_label(&format!("Q{}", q.number), q));
            graph.edge("paper", &qid);

            for sub in &q.subquestions {
                let sid = format!("q{}_{}", q.number, sub.number);
                let name = format!("Q{}.{}", q.number, sub.number);
                graph.node(sid.clone(), NodeKind::SubQuestion, question_label(&name, sub));
                graph.edge(&qid, &sid);
            }

            for o in &q.options {
                let oid = format!("q{}_opt_{}", q.number, o.letter);
                graph.node(oid.clone(), NodeKind::Option, format!("{}. {}", o.letter, o.text));
                graph.edge(&qid, &oid);
            }
        }

        graph
    }

    fn node(&mut self, id: String, kind: NodeKind, label: String) {
        self.nodes.push(GraphNode { id, kind, label });
    }

    fn edge(&mut self, from: &str, to: &str) {
        self.edges.push(GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str("digraph AST {\n");
        out.push_str("  node [shape=box, style=\"filled\", fillcolor=\"lightblue\"];\n");
        for node in &self.nodes {
            let _ = writeln!(out, "  {} [label=\"{}\"];", node.id, escape(&node.label));
        }
        for edge in &self.edges {
            let _ = writeln!(out, "  {} -> {};", edge.from, edge.to);
        }
        out.push_str("}\n");
        out
    }
}

fn paper_label(paper: &Paper) -> String {
    format!(
        "{}\nMarks: {}\nTime: {} min",
        paper.title, paper.declared_total_marks, paper.declared_duration_minutes
    )
}

fn question_label(name: &str, q: &Question) -> String {
    let mut label = format!("{name} [{}] ({} marks)", q.kind, q.marks);
    if let Some(topic) = &q.topic {
        let _ = write!(label, "\nTopic: {topic}");
    }
    let _ = write!(label, "\nDifficulty: {}", q.difficulty);
    if !q.text.is_empty() {
        let _ = write!(label, "\n{}", excerpt(&q.text, 40));
    }
    label
}

/// First line of the text, cut to `max` characters.
fn excerpt(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max).collect();
        format!("{cut}...")
    }
}

/// DOT string literal body.
fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
