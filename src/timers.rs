use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimerAction {
    RevertHighlight(NodeId),
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) action: TimerAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
}

#[derive(Debug)]
pub(crate) struct SchedulerState {
    pub(crate) task_queue: Vec<ScheduledTask>,
    pub(crate) now_ms: i64,
    pub(crate) next_timer_id: i64,
    pub(crate) next_task_order: i64,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            task_queue: Vec::new(),
            now_ms: 0,
            next_timer_id: 1,
            next_task_order: 0,
        }
    }
}

impl SchedulerState {
    pub(crate) fn allocate_timer_id(&mut self) -> i64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        id
    }

    pub(crate) fn allocate_task_order(&mut self) -> i64 {
        let order = self.next_task_order;
        self.next_task_order += 1;
        order
    }
}

impl Page {
    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .scheduler
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Config(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.scheduler.now_ms;
        self.scheduler.now_ms = self.scheduler.now_ms.saturating_add(delta_ms);
        let ran = self.run_timer_queue(Some(self.scheduler.now_ms), false)?;
        self.trace_line(format!(
            "[timer] advance delta_ms={} from={} to={} ran_due={}",
            delta_ms, from, self.scheduler.now_ms, ran
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        if target_ms < self.scheduler.now_ms {
            return Err(Error::Config(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={})",
                self.scheduler.now_ms
            )));
        }
        self.advance_time(target_ms - self.scheduler.now_ms)
    }

    /// Runs every pending timer, moving the clock forward as needed.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.scheduler.now_ms;
        let ran = self.run_timer_queue(None, true)?;
        self.trace_line(format!(
            "[timer] flush from={} to={} ran={}",
            from, self.scheduler.now_ms, ran
        ));
        Ok(())
    }

    pub(crate) fn schedule_timeout(&mut self, delay_ms: i64, action: TimerAction) -> i64 {
        let id = self.scheduler.allocate_timer_id();
        let order = self.scheduler.allocate_task_order();
        let due_at = self.scheduler.now_ms.saturating_add(delay_ms.max(0));
        self.scheduler.task_queue.push(ScheduledTask {
            id,
            due_at,
            order,
            action,
        });
        self.trace_line(format!("[timer] schedule id={id} due_at={due_at}"));
        id
    }

    pub(crate) fn clear_timeout(&mut self, timer_id: i64) -> bool {
        let before = self.scheduler.task_queue.len();
        self.scheduler.task_queue.retain(|task| task.id != timer_id);
        before != self.scheduler.task_queue.len()
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>, advance_clock: bool) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(next_idx) = self.next_task_index(due_limit) {
            steps += 1;
            let task = self.scheduler.task_queue.remove(next_idx);
            if advance_clock && task.due_at > self.scheduler.now_ms {
                self.scheduler.now_ms = task.due_at;
            }
            self.execute_timer_task(task)?;
        }
        Ok(steps)
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.scheduler
            .task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    fn execute_timer_task(&mut self, task: ScheduledTask) -> Result<()> {
        self.trace_line(format!("[timer] run id={} due_at={}", task.id, task.due_at));
        match task.action {
            TimerAction::RevertHighlight(node) => self.revert_highlight(node),
        }
    }
}
