use crate::dims::Pos;

/// Receives one notification per cell visitation while a solver runs.
///
/// Observers are informational only, they never see the maze mutably and cannot stop a solve.
pub trait Observer {
    fn visit(&mut self, pos: Pos);
}

impl Observer for () {
    fn visit(&mut self, _: Pos) {}
}

impl<F: FnMut(Pos)> Observer for F {
    fn visit(&mut self, pos: Pos) {
        self(pos)
    }
}

/// Counts visits against an expected total.
#[derive(Debug, Clone, Copy, Default)]
pub struct Progress {
    pub done: usize,
    pub from: usize,
    pub is_done: bool,
}

impl Progress {
    pub fn new(done: usize, from: usize) -> Self {
        Self {
            done,
            from,
            is_done: false,
        }
    }

    pub fn new_empty() -> Self {
        Self::new(0, 0)
    }

    pub fn percent(&self) -> f32 {
        if self.from == 0 {
            return if self.is_done { 1.0 } else { 0.0 };
        }

        self.done as f32 / self.from as f32
    }

    pub fn finish(&mut self) {
        self.done = self.from;
        self.is_done = true;
    }

    pub fn combine(&self, other: &Self) -> Self {
        Self {
            done: self.done + other.done,
            from: self.from + other.from,
            is_done: self.is_done && other.is_done,
        }
    }
}

impl Observer for Progress {
    fn visit(&mut self, _: Pos) {
        self.done += 1;
    }
}

/// Records every visited position in order, the footprints of a solve.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    visits: Vec<Pos>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> &[Pos] {
        &self.visits
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn clear(&mut self) {
        self.visits.clear();
    }
}

impl Observer for Trail {
    fn visit(&mut self, pos: Pos) {
        self.visits.push(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_counts_visits() {
        let mut progress = Progress::new(0, 4);
        progress.visit(Pos(0, 0));
        progress.visit(Pos(0, 1));
        assert_eq!(progress.done, 2);
        assert!((progress.percent() - 0.5).abs() < f32::EPSILON);

        progress.finish();
        assert!(progress.is_done);
        assert_eq!(progress.done, 4);
    }

    #[test]
    fn empty_progress_percent() {
        let mut progress = Progress::new_empty();
        assert_eq!(progress.percent(), 0.0);
        progress.finish();
        assert_eq!(progress.percent(), 1.0);
    }

    #[test]
    fn combine_sums_parts() {
        let a = Progress::new(1, 3);
        let mut b = Progress::new(2, 2);
        b.is_done = true;

        let both = a.combine(&b);
        assert_eq!(both.done, 3);
        assert_eq!(both.from, 5);
        assert!(!both.is_done);
    }

    #[test]
    fn closures_and_trails_observe() {
        let mut count = 0;
        {
            let mut counter = |_: Pos| count += 1;
            counter.visit(Pos(1, 1));
            counter.visit(Pos(1, 2));
        }
        assert_eq!(count, 2);

        let mut trail = Trail::new();
        trail.visit(Pos(0, 0));
        trail.visit(Pos(0, 1));
        assert_eq!(trail.visits(), &[Pos(0, 0), Pos(0, 1)]);
    }
}
