use super::{partition, util, GenerateOptions, WORK_STUDY_HOURS};
use crate::availability::AvailabilityPolicy;
use crate::model::{HoursOfOperation, Shift, ShiftStatus, Worker, WorkerRef};
use crate::time::{self, Weekday, EPSILON};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// État courant d'une génération : heures cumulées, créneaux tenus et
/// intervalles déjà couverts par jour.
pub(super) struct Assignment<'a, P> {
    workers: &'a [Worker],
    policy: &'a P,
    opts: &'a GenerateOptions,
    hours: Vec<f64>,
    spans: Vec<Vec<(f64, f64)>>,
    consumed: BTreeMap<Weekday, Vec<(f64, f64)>>,
    shifts: BTreeMap<Weekday, Vec<Shift>>,
}

impl<'a, P: AvailabilityPolicy> Assignment<'a, P> {
    pub(super) fn new(workers: &'a [Worker], policy: &'a P, opts: &'a GenerateOptions) -> Self {
        Self {
            workers,
            policy,
            opts,
            hours: vec![0.0; workers.len()],
            spans: vec![Vec::new(); workers.len()],
            consumed: BTreeMap::new(),
            shifts: BTreeMap::new(),
        }
    }

    /// Passe A : chaque work-study reçoit, si possible, un créneau dédié de
    /// exactement 5 heures.
    pub(super) fn assign_work_study<R: Rng + ?Sized>(
        &mut self,
        hours: &HoursOfOperation,
        rng: &mut R,
    ) {
        let mut order: Vec<usize> = self
            .workers
            .iter()
            .enumerate()
            .filter(|(_, w)| w.work_study)
            .map(|(idx, _)| idx)
            .collect();
        if order.is_empty() {
            return;
        }
        if self.opts.max_hours() + EPSILON < WORK_STUDY_HOURS {
            warn!(
                max_hours = self.opts.max_hours_per_worker,
                "max hours below the work-study quota, skipping work-study pass"
            );
            return;
        }
        order.shuffle(rng);

        let workers = self.workers;
        for idx in order {
            let mut candidates: Vec<(Weekday, f64)> = Vec::new();
            for (day, blocks) in hours {
                for block in blocks {
                    let mut start = block.start_hour;
                    while start + WORK_STUDY_HOURS <= block.end_hour + EPSILON {
                        candidates.push((*day, start));
                        start += 1.0;
                    }
                }
            }
            candidates.shuffle(rng);

            let worker = &workers[idx];
            let found = candidates.into_iter().find(|&(day, start)| {
                let end = start + WORK_STUDY_HOURS;
                !self.is_consumed(day, start, end)
                    && self.policy.is_available(worker, day, start, end)
                    && !self.holds_overlapping(idx, day, start, end)
            });

            match found {
                Some((day, start)) => {
                    let end = start + WORK_STUDY_HOURS;
                    debug!(
                        worker = %worker.email,
                        day = %day,
                        start = %time::format_time(start),
                        "work-study block reserved"
                    );
                    self.commit(idx, day, start, end);
                    let available = self.available_for(day, start, end);
                    self.push_shift(Shift {
                        id: util::shift_id(rng),
                        day,
                        start_hour: start,
                        end_hour: end,
                        status: ShiftStatus::Filled(vec![worker.to_ref()]),
                        available,
                        is_work_study: true,
                    });
                }
                None => warn!(worker = %worker.email, "no 5-hour window for work-study worker"),
            }
        }
    }

    /// Passe B : couvre le reste des heures d'ouverture.
    pub(super) fn assign_regular<R: Rng + ?Sized>(
        &mut self,
        hours: &HoursOfOperation,
        lengths: &[u32],
        rng: &mut R,
    ) {
        let mut days: Vec<Weekday> = hours
            .iter()
            .filter(|(_, blocks)| !blocks.is_empty())
            .map(|(day, _)| *day)
            .collect();
        days.shuffle(rng);

        for day in days {
            self.shifts.entry(day).or_default();
            let mut blocks = hours.get(&day).cloned().unwrap_or_default();
            blocks.shuffle(rng);

            for block in blocks {
                let consumed = self.consumed.get(&day).cloned().unwrap_or_default();
                let windows =
                    partition::partition_block(&block, &consumed, lengths, self.opts.min_shift_length);
                for (start, end) in windows {
                    self.fill_shift(day, start, end, rng);
                }
            }
        }
    }

    fn fill_shift<R: Rng + ?Sized>(&mut self, day: Weekday, start: f64, end: f64, rng: &mut R) {
        let available: Vec<usize> = (0..self.workers.len())
            .filter(|&idx| self.policy.is_available(&self.workers[idx], day, start, end))
            .collect();

        let mut eligible: Vec<(usize, u64)> = available
            .iter()
            .copied()
            .filter(|&idx| self.is_eligible(idx, day, start, end))
            .map(|idx| (idx, rng.random::<u64>()))
            .collect();
        eligible.sort_by(|a, b| {
            self.hours[a.0]
                .total_cmp(&self.hours[b.0])
                .then(a.1.cmp(&b.1))
        });

        let max = self.opts.max_workers_per_shift as usize;
        let chosen: Vec<usize> = eligible.iter().take(max).map(|(idx, _)| *idx).collect();
        for &idx in &chosen {
            self.commit(idx, day, start, end);
        }

        if chosen.is_empty() {
            warn!(
                day = %day,
                start = %time::format_time(start),
                end = %time::format_time(end),
                available = available.len(),
                "shift left unfilled"
            );
        }

        let status =
            ShiftStatus::from_workers(chosen.iter().map(|&idx| self.workers[idx].to_ref()).collect());
        let available = available.iter().map(|&idx| self.workers[idx].to_ref()).collect();
        self.push_shift(Shift {
            id: util::shift_id(rng),
            day,
            start_hour: start,
            end_hour: end,
            status,
            available,
            is_work_study: false,
        });
    }

    fn is_eligible(&self, idx: usize, day: Weekday, start: f64, end: f64) -> bool {
        let worker = &self.workers[idx];
        let current = self.hours[idx];
        let duration = end - start;

        if worker.work_study {
            if current + EPSILON >= WORK_STUDY_HOURS {
                return false;
            }
            // un work-study ne prend qu'un créneau de 5h, jamais de cumul partiel
            if !time::approx_eq(duration, WORK_STUDY_HOURS) {
                return false;
            }
        }
        if current + duration > self.opts.max_hours() + EPSILON {
            return false;
        }
        !self.holds_overlapping(idx, day, start, end)
    }

    fn is_consumed(&self, day: Weekday, start: f64, end: f64) -> bool {
        self.consumed
            .get(&day)
            .is_some_and(|spans| spans.iter().any(|&(s, e)| time::overlaps(s, e, start, end)))
    }

    fn holds_overlapping(&self, idx: usize, day: Weekday, start: f64, end: f64) -> bool {
        let span = util::week_span(day, start, end);
        self.spans[idx].iter().any(|held| util::week_overlaps(*held, span))
    }

    fn available_for(&self, day: Weekday, start: f64, end: f64) -> Vec<WorkerRef> {
        self.workers
            .iter()
            .filter(|w| self.policy.is_available(w, day, start, end))
            .map(Worker::to_ref)
            .collect()
    }

    fn commit(&mut self, idx: usize, day: Weekday, start: f64, end: f64) {
        self.hours[idx] += end - start;
        self.spans[idx].push(util::week_span(day, start, end));
    }

    fn push_shift(&mut self, shift: Shift) {
        self.consumed
            .entry(shift.day)
            .or_default()
            .push((shift.start_hour, shift.end_hour));
        self.shifts.entry(shift.day).or_default().push(shift);
    }

    /// Créneaux de chaque jour triés par heure de début.
    pub(super) fn finish(mut self) -> BTreeMap<Weekday, Vec<Shift>> {
        for shifts in self.shifts.values_mut() {
            shifts.sort_by(|a, b| a.start_hour.total_cmp(&b.start_hour));
        }
        self.shifts
    }
}
