//! The Motion Planner (§4.E): turns an abstract move (source,
//! destination, and a snapshot of the board as it stood just before
//! the move began) into a sequence of [`Command`] entries that
//! physically relocate pieces on the gantry rig, evacuating and
//! restoring blockers along the way as needed.

use std::collections::{HashSet, VecDeque};

use crate::commands::CommandQueue;
use crate::config::AutoboardConfig;
use crate::error::PlannerError;
use crate::model::board::Board;
use crate::model::Square;
use crate::motion::Command;

const GRID: usize = Square::SIZE as usize * Square::SIZE as usize;

/// Tracks, beyond a one-time calibration flag, the accumulated
/// per-axis overshoot issued by the drag-compensation nudge in
/// [`MotionPlanner::move_by`] since the last recalibration nudge.
#[derive(Debug, Default)]
pub struct MotionPlanner {
    parked: bool,
    accumulated_overshoot: (f32, f32),
}

impl MotionPlanner {
    pub fn new() -> Self {
        Self {
            parked: false,
            accumulated_overshoot: (0.0, 0.0),
        }
    }

    pub fn is_parked(&self) -> bool {
        self.parked
    }

    /// One-time startup sequence, supplemented from the original
    /// firmware's `init_board()` (which drove the gantry to a far
    /// corner before ever trusting a remembered position): magnet off,
    /// drive both axes hard past any real coordinate so the rig rides
    /// into its physical home stops, then treat that corner as pose
    /// zero.
    pub fn park_at_corner(&mut self, queue: &mut CommandQueue, _config: &AutoboardConfig) {
        queue.push(Command::magnet_toggle(false));
        let hard_home = -(Square::SIZE as f32 + 1.0);
        queue.push(Command::both_axes(hard_home, hard_home));
        self.accumulated_overshoot = (0.0, 0.0);
        self.parked = true;
    }

    /// The original firmware's `motor_reset()`: re-zeroes the
    /// accumulated drag-compensation overshoot between moves by
    /// issuing its inverse, rather than letting repeated overshoot
    /// commands compound across a long game. Called automatically at
    /// the end of every [`MotionPlanner::transit`] /
    /// [`MotionPlanner::direct_transit`].
    fn settle_overshoot(&mut self, queue: &mut CommandQueue) {
        let (rank, file) = self.accumulated_overshoot;
        Self::emit_axes(-rank, -file, queue);
        self.accumulated_overshoot = (0.0, 0.0);
    }

    /// A single uninterrupted relative move: pick up at `src`, travel
    /// straight to `dst`, set down. Used for knight hops (their own
    /// movement already jumps anything in between) and for the rook's
    /// hop during castling, where the transit square is known empty by
    /// construction (§4.E).
    pub fn direct_transit(
        &mut self,
        src: Square,
        dst: Square,
        queue: &mut CommandQueue,
        config: &AutoboardConfig,
    ) -> Result<(), PlannerError> {
        queue.push(Command::magnet_toggle(true));
        self.move_by(
            dst.rank as f32 - src.rank as f32,
            dst.file as f32 - src.file as f32,
            queue,
            config,
        );
        queue.push(Command::magnet_toggle(false));
        self.settle_overshoot(queue);
        Ok(())
    }

    /// The general case (§4.E): route `src` to `dst` around whatever
    /// `board` (the snapshot taken before this move began) says is in
    /// the way, evacuating and restoring any blockers found on the
    /// route.
    pub fn transit(
        &mut self,
        board: &Board,
        src: Square,
        dst: Square,
        queue: &mut CommandQueue,
        config: &AutoboardConfig,
    ) -> Result<(), PlannerError> {
        let (cost, prev) = Self::reachability(board, src);
        let path = Self::build_path(&cost, &prev, src, dst).ok_or(PlannerError::NoEvacuationExit)?;

        let mut working = board.clone();
        let exits = Self::exit_census(&working, &path);
        let nearest = Self::nearest_exit_indices(&exits);

        self.clear_and_move(&mut working, &path, &nearest, queue, config)?;
        self.settle_overshoot(queue);
        Ok(())
    }

    /// Multi-level reachability flood over the entire 10x10 grid
    /// (§4.E step 1-2). Level 1 is `source` together with every empty
    /// cell reachable from it without crossing an occupied square.
    /// Each subsequent level seeds from the occupied cells bordering
    /// the previous level (one "evacuation" deep) and floods their own
    /// empty-connected region at that new level. `prev` records a BFS
    /// parent for every labeled cell, so a path can be read straight
    /// back out of it.
    fn reachability(board: &Board, source: Square) -> ([u32; GRID], [Option<usize>; GRID]) {
        let mut cost = [u32::MAX; GRID];
        let mut prev: [Option<usize>; GRID] = [None; GRID];
        let source_ix = source.ix();
        cost[source_ix] = 1;

        let mut frontier: VecDeque<usize> = VecDeque::new();
        frontier.push_back(source_ix);
        let mut level = 1u32;

        loop {
            while let Some(ix) = frontier.pop_front() {
                let sq = Square::from_ix(ix);
                for n in sq.neighbours4() {
                    let nix = n.ix();
                    if cost[nix] != u32::MAX {
                        continue;
                    }
                    if board.get(n).is_none() {
                        cost[nix] = level;
                        prev[nix] = Some(ix);
                        frontier.push_back(nix);
                    }
                }
            }

            let mut seeds = Vec::new();
            for ix in 0..GRID {
                if cost[ix] != u32::MAX {
                    continue;
                }
                let sq = Square::from_ix(ix);
                if let Some(parent) = sq.neighbours4().map(|n| n.ix()).find(|&nix| cost[nix] != u32::MAX) {
                    seeds.push((ix, parent));
                }
            }
            if seeds.is_empty() {
                break;
            }
            level += 1;
            for (ix, parent) in seeds {
                cost[ix] = level;
                prev[ix] = Some(parent);
                frontier.push_back(ix);
            }
        }

        (cost, prev)
    }

    /// Walks `prev` back from `dst` to `src`. Returns the path with
    /// `path[0] == dst` and `path[length] == src` (§4.E step 2: the
    /// order of endpoints is intentional).
    fn build_path(cost: &[u32; GRID], prev: &[Option<usize>; GRID], src: Square, dst: Square) -> Option<Vec<Square>> {
        if cost[dst.ix()] == u32::MAX {
            return None;
        }
        let mut path = vec![dst];
        let mut cur = dst.ix();
        while cur != src.ix() {
            cur = prev[cur]?;
            path.push(Square::from_ix(cur));
        }
        Some(path)
    }

    /// Off-path, empty 4-neighbour count for every path cell except
    /// the source (index `path.len() - 1`), which is never a target
    /// for evacuation since the mover starts there (§4.E step 3).
    fn exit_census(board: &Board, path: &[Square]) -> Vec<usize> {
        let on_path: HashSet<usize> = path.iter().map(|s| s.ix()).collect();
        let source_index = path.len() - 1;
        path.iter()
            .enumerate()
            .map(|(i, sq)| {
                if i == source_index {
                    return 0;
                }
                sq.neighbours4()
                    .filter(|n| board.get(*n).is_none() && !on_path.contains(&n.ix()))
                    .count()
            })
            .collect()
    }

    /// For every path index, the nearest index (by path distance) that
    /// has at least one exit. Computed in two passes — left-to-right
    /// then right-to-left, the second only overwriting on a strictly
    /// closer match — so a tie between two equidistant exits is always
    /// resolved in favour of the one found by the first pass (§9: "an
    /// implementer should pick a deterministic order and declare it").
    fn nearest_exit_indices(exits: &[usize]) -> Vec<Option<usize>> {
        let n = exits.len();
        let mut nearest = vec![None; n];

        let mut last = None;
        for (i, nearest_i) in nearest.iter_mut().enumerate() {
            if exits[i] > 0 {
                last = Some(i);
            }
            *nearest_i = last;
        }

        let mut last = None;
        for i in (0..n).rev() {
            if exits[i] > 0 {
                last = Some(i);
            }
            if let Some(r) = last {
                let closer = match nearest[i] {
                    None => true,
                    Some(l) => (r as i64 - i as i64).abs() < (l as i64 - i as i64).abs(),
                };
                if closer {
                    nearest[i] = Some(r);
                }
            }
        }

        nearest
    }

    /// Clears blockers off `path` in strictly increasing order of their
    /// path-distance to their nearest off-path exit (§4.E step 4:
    /// "exitDist starts at 0; scan the whole path for cells at that
    /// distance from an exit, evacuate all of them, then increment
    /// exitDist and rescan"). Processing nearer blockers first
    /// guarantees that by the time a farther blocker is evacuated,
    /// every blocker that stood between it and its own exit is already
    /// out of the way — evacuating in simple path-position order
    /// instead can walk a farther blocker straight onto a nearer one
    /// that hasn't moved yet. Only once every blocker is off the path
    /// does the mover travel it in one continuous pass; evacuated
    /// blockers are then restored in reverse (most recently evacuated
    /// first). Index 0 (the destination) and the last index (the
    /// mover's own source) are never treated as blockers: whatever a
    /// stale board snapshot shows sitting on the destination is this
    /// very move's own capture, already resolved by the executor, not
    /// a piece to evacuate and restore.
    fn clear_and_move(
        &mut self,
        working: &mut Board,
        path: &[Square],
        nearest: &[Option<usize>],
        queue: &mut CommandQueue,
        config: &AutoboardConfig,
    ) -> Result<(), PlannerError> {
        let mut evacuations: Vec<(usize, Evacuation)> = Vec::new();

        for exit_dist in 0..path.len() {
            for idx in 1..path.len() - 1 {
                if working.get(path[idx]).is_none() {
                    continue;
                }
                let exit_index = nearest[idx].ok_or(PlannerError::NoEvacuationExit)?;
                if idx.abs_diff(exit_index) != exit_dist {
                    continue;
                }
                let evac = self.evacuate_blocker(working, path, idx, exit_index, queue, config);
                evacuations.push((idx, evac));
            }
        }

        self.move_along_path(path, queue, config);

        for (idx, evac) in evacuations.into_iter().rev() {
            self.restore_blocker(working, path, idx, evac, queue, config);
        }

        Ok(())
    }

    /// Moves the mover itself from `path.last()` (source) to `path[0]`
    /// (destination) under one continuous magnet-on pass, stepping
    /// through every intermediate waypoint so it never drags across an
    /// occupied square.
    fn move_along_path(&mut self, path: &[Square], queue: &mut CommandQueue, config: &AutoboardConfig) {
        queue.push(Command::magnet_toggle(true));
        for pair in path.windows(2).rev() {
            let (towards, from) = (pair[0], pair[1]);
            self.move_by(
                towards.rank as f32 - from.rank as f32,
                towards.file as f32 - from.file as f32,
                queue,
                config,
            );
        }
        queue.push(Command::magnet_toggle(false));
    }

    /// One continuous magnet-on motion: step the blocker at
    /// `path[blocker_index]` along the path toward `path[exit_index]`,
    /// then sideways off-path onto an empty, off-path neighbour (§4.E
    /// step 3).
    fn evacuate_blocker(
        &mut self,
        working: &mut Board,
        path: &[Square],
        blocker_index: usize,
        exit_index: usize,
        queue: &mut CommandQueue,
        config: &AutoboardConfig,
    ) -> Evacuation {
        let start = path[blocker_index];
        let piece = working.get(start);

        queue.push(Command::magnet_toggle(true));

        let step: i64 = if (exit_index as i64) < blocker_index as i64 { -1 } else { 1 };
        let mut cur = start;
        let mut idx = blocker_index as i64;
        while idx != exit_index as i64 {
            idx += step;
            let next = path[idx as usize];
            self.move_by(next.rank as f32 - cur.rank as f32, next.file as f32 - cur.file as f32, queue, config);
            cur = next;
        }

        let on_path: HashSet<usize> = path.iter().map(|s| s.ix()).collect();
        let exit_square = cur
            .neighbours4()
            .find(|n| working.get(*n).is_none() && !on_path.contains(&n.ix()))
            .expect("exit census guarantees an off-path empty neighbour here");
        self.move_by(
            exit_square.rank as f32 - cur.rank as f32,
            exit_square.file as f32 - cur.file as f32,
            queue,
            config,
        );

        queue.push(Command::magnet_toggle(false));

        working.clear(start);
        working.place(exit_square, piece);

        Evacuation {
            exit_square,
            rejoin_index: idx as usize,
        }
    }

    /// Retraces `evac` exactly in reverse: back onto the path at the
    /// same rejoin point, then along the path back to
    /// `path[blocker_index]`.
    fn restore_blocker(
        &mut self,
        working: &mut Board,
        path: &[Square],
        blocker_index: usize,
        evac: Evacuation,
        queue: &mut CommandQueue,
        config: &AutoboardConfig,
    ) {
        let piece = working.get(evac.exit_square);
        let rejoin = path[evac.rejoin_index];

        queue.push(Command::magnet_toggle(true));
        self.move_by(
            rejoin.rank as f32 - evac.exit_square.rank as f32,
            rejoin.file as f32 - evac.exit_square.file as f32,
            queue,
            config,
        );

        let step: i64 = if (blocker_index as i64) < evac.rejoin_index as i64 { -1 } else { 1 };
        let mut cur = rejoin;
        let mut idx = evac.rejoin_index as i64;
        while idx != blocker_index as i64 {
            idx += step;
            let next = path[idx as usize];
            self.move_by(next.rank as f32 - cur.rank as f32, next.file as f32 - cur.file as f32, queue, config);
            cur = next;
        }
        queue.push(Command::magnet_toggle(false));

        working.clear(evac.exit_square);
        working.place(path[blocker_index], piece);
    }

    /// Emits the command(s) for a relative move of `(d_rank, d_file)`
    /// cell-widths, with `config.motor_overflow` drag compensation:
    /// overshoot past the target in the direction of travel on every
    /// moving axis, then correct back onto the exact target, before
    /// any subsequent magnet toggle. The original firmware declared
    /// this constant but never wired it into a call site; this is
    /// where it is actually applied.
    fn move_by(&mut self, d_rank: f32, d_file: f32, queue: &mut CommandQueue, config: &AutoboardConfig) {
        if d_rank == 0.0 && d_file == 0.0 {
            return;
        }
        let overflow = config.motor_overflow;
        let over_rank = d_rank + d_rank.signum() * overflow;
        let over_file = d_file + d_file.signum() * overflow;
        Self::emit_axes(over_rank, over_file, queue);
        Self::emit_axes(d_rank - over_rank, d_file - over_file, queue);
        self.accumulated_overshoot.0 += over_rank - d_rank;
        self.accumulated_overshoot.1 += over_file - d_file;
    }

    fn emit_axes(d_rank: f32, d_file: f32, queue: &mut CommandQueue) {
        match (d_rank != 0.0, d_file != 0.0) {
            (true, true) => queue.push(Command::both_axes(d_rank, d_file)),
            (true, false) => queue.push(Command::x_axis(d_rank)),
            (false, true) => queue.push(Command::y_axis(d_file)),
            (false, false) => {}
        }
    }
}

/// Where a blocker was parked, and which path index it needs to step
/// back onto to return to `path[blocker_index]`.
struct Evacuation {
    exit_square: Square,
    rejoin_index: usize,
}
