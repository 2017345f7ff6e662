use log::{debug, trace};

use crate::error::{PrereqError, Result};
use crate::ir::{CourseGraph, CourseIndex};

/// Dependency level of every course, indexed like the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Levels {
    levels: Vec<usize>,
}

impl Levels {
    pub fn get(&self, idx: CourseIndex) -> usize {
        self.levels[idx]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.levels
    }

    pub fn max_level(&self) -> usize {
        self.levels.iter().copied().max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done(usize),
}

struct Frame {
    node: CourseIndex,
    deps: Vec<CourseIndex>,
    cursor: usize,
}

impl Frame {
    fn new(graph: &CourseGraph, node: CourseIndex) -> Self {
        let course = graph.course(node);
        Self {
            node,
            deps: course.requires().chain(course.corequires()).collect(),
            cursor: 0,
        }
    }
}

/// Longest-path depth over prerequisites, floored by corequisite levels.
///
/// Walks the graph depth-first with an explicit stack so every course is
/// evaluated once. Reaching a course that is still on the stack is a cycle.
pub fn assign_levels(graph: &CourseGraph) -> Result<Levels> {
    let mut marks = vec![Mark::Unvisited; graph.len()];

    for root in 0..graph.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::InProgress;
        let mut stack = vec![Frame::new(graph, root)];

        while let Some(top) = stack.last_mut() {
            let next = top.deps.get(top.cursor).copied();
            let Some(dep) = next else {
                let node = top.node;
                let level = level_from_deps(graph, node, &marks);
                trace!(course:% = graph.course(node).id, level; "Level assigned");
                marks[node] = Mark::Done(level);
                stack.pop();
                continue;
            };
            top.cursor += 1;

            match marks[dep] {
                Mark::Done(_) => {}
                Mark::InProgress => {
                    let start = stack
                        .iter()
                        .position(|frame| frame.node == dep)
                        .unwrap_or(0);
                    let mut path: Vec<_> = stack[start..]
                        .iter()
                        .map(|frame| graph.course(frame.node).id.clone())
                        .collect();
                    path.push(graph.course(dep).id.clone());
                    return Err(PrereqError::Cycle { path });
                }
                Mark::Unvisited => {
                    marks[dep] = Mark::InProgress;
                    stack.push(Frame::new(graph, dep));
                }
            }
        }
    }

    let levels: Vec<usize> = marks
        .into_iter()
        .map(|mark| match mark {
            Mark::Done(level) => level,
            Mark::Unvisited | Mark::InProgress => 0,
        })
        .collect();
    let levels = Levels { levels };
    debug!(courses = levels.len(), max_level = levels.max_level(); "Levels assigned");
    Ok(levels)
}

fn level_from_deps(graph: &CourseGraph, node: CourseIndex, marks: &[Mark]) -> usize {
    let done = |idx: CourseIndex| match marks[idx] {
        Mark::Done(level) => level,
        Mark::Unvisited | Mark::InProgress => 0,
    };
    let course = graph.course(node);
    let by_requires = course.requires().map(|r| done(r) + 1).max().unwrap_or(0);
    let by_corequires = course.corequires().map(done).max().unwrap_or(0);
    by_requires.max(by_corequires)
}
