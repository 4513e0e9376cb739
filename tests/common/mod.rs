#![allow(dead_code)]

use rand::{rngs::StdRng, Rng, SeedableRng};
use shakmaty::{Color, Outcome};
use supervised_chess::core::{error::EvaluationError, evaluator::Evaluator, position::Position};

/// A small explicit game tree. Every node has a White-relative value, used
/// as the static evaluation.
#[derive(Clone, Debug)]
pub struct Tree {
    children: Vec<Vec<usize>>,
    values: Vec<f32>,
    /// Nodes from the root to the current one
    path: Vec<usize>,
    root_turn: Color,
}

impl Tree {
    /// A root whose children are leaves with the given values
    pub fn one_ply(values: &[f32]) -> Self {
        let mut tree = Tree::leaf(0.0);
        for &value in values {
            tree.add(0, value);
        }
        tree
    }

    /// A root with one child per group, each child having leaves with the
    /// values of its group
    pub fn two_ply(groups: &[Vec<f32>]) -> Self {
        let mut tree = Tree::leaf(0.0);
        for group in groups {
            let child = tree.add(0, 0.0);
            for &value in group {
                tree.add(child, value);
            }
        }
        tree
    }

    /// Complete tree, leaf and inner values drawn from a seeded generator
    pub fn random(seed: u64, branching: usize, depth: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tree = Tree::leaf(rng.gen_range(-1.0..1.0));
        let mut frontier = vec![0];

        for _ in 0..depth {
            let mut next = vec![];
            for node in frontier {
                for _ in 0..rng.gen_range(1..=branching) {
                    next.push(tree.add(node, rng.gen_range(-1.0..1.0)));
                }
            }
            frontier = next;
        }

        tree
    }

    pub fn with_root_turn(mut self, turn: Color) -> Self {
        self.root_turn = turn;
        self
    }

    pub fn current(&self) -> usize {
        *self.path.last().unwrap()
    }

    fn leaf(value: f32) -> Self {
        Tree {
            children: vec![vec![]],
            values: vec![value],
            path: vec![0],
            root_turn: Color::White,
        }
    }

    fn add(&mut self, parent: usize, value: f32) -> usize {
        let id = self.values.len();
        self.children.push(vec![]);
        self.values.push(value);
        self.children[parent].push(id);
        id
    }
}

impl Position for Tree {
    /// Index of the child to move to
    type Action = usize;

    fn valid_actions(&self) -> Vec<usize> {
        (0..self.children[self.current()].len()).collect()
    }

    fn is_legal(&self, action: &usize) -> bool {
        *action < self.children[self.current()].len()
    }

    fn push(&mut self, action: &usize) {
        let next = self.children[self.current()][*action];
        self.path.push(next);
    }

    fn pop(&mut self) -> Option<usize> {
        if self.path.len() == 1 {
            return None;
        }
        let node = self.path.pop()?;
        self.children[self.current()].iter().position(|&c| c == node)
    }

    fn turn(&self) -> Color {
        if self.path.len() % 2 == 1 {
            self.root_turn
        } else {
            !self.root_turn
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        None
    }
}

/// Reads the value of the current node and counts the calls
#[derive(Default)]
pub struct TreeEvaluator {
    pub calls: usize,
}

impl Evaluator<Tree> for TreeEvaluator {
    fn evaluate(&mut self, position: &mut Tree) -> Result<f32, EvaluationError> {
        self.calls += 1;
        Ok(position.values[position.current()])
    }
}

/// Fails on the given call
pub struct FailingEvaluator<E> {
    pub inner: E,
    pub fail_on: usize,
    pub calls: usize,
}

impl<P: Position, E: Evaluator<P>> Evaluator<P> for FailingEvaluator<E> {
    fn evaluate(&mut self, position: &mut P) -> Result<f32, EvaluationError> {
        self.calls += 1;
        if self.calls == self.fail_on {
            return Err(EvaluationError::Unavailable("scripted failure".to_string()));
        }
        self.inner.evaluate(position)
    }
}
