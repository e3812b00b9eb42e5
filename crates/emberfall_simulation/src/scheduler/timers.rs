//! One-shot таймеры с cancel
//!
//! Таймер = (due time, payload). Payload — данные "callback'а", которые
//! диспетчер превращает в событие при срабатывании. Очередь живёт на
//! simulation clock (сумма fixed delta), не на wall clock.

use bevy::prelude::*;

/// Стабильный handle таймера (монотонный, никогда не переиспользуется)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct PendingTimer<T> {
    handle: TimerHandle,
    due: f64,
    payload: T,
}

/// Очередь one-shot таймеров
///
/// Порядок срабатывания внутри одного advance: по due time,
/// при равенстве — в порядке schedule (handle монотонный).
#[derive(Resource, Debug)]
pub struct TimerQueue<T: Send + Sync + 'static> {
    now: f64,
    next_id: u64,
    pending: Vec<PendingTimer<T>>,
}

impl<T: Send + Sync + 'static> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T: Send + Sync + 'static> TimerQueue<T> {
    /// Запланировать payload через `delay` секунд (отрицательный delay = 0)
    pub fn schedule(&mut self, delay: f32, payload: T) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);

        self.pending.push(PendingTimer {
            handle,
            due: self.now + f64::from(delay.max(0.0)),
            payload,
        });

        handle
    }

    /// Отменить таймер. false — таймер уже сработал или отменён
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|timer| timer.handle == handle) {
            Some(index) => {
                self.pending.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|timer| timer.handle == handle)
    }

    /// Сколько секунд осталось до срабатывания
    pub fn remaining(&self, handle: TimerHandle) -> Option<f32> {
        self.pending
            .iter()
            .find(|timer| timer.handle == handle)
            .map(|timer| (timer.due - self.now).max(0.0) as f32)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Simulation clock (секунды с создания очереди)
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Сдвинуть clock на `delta` и вернуть все сработавшие таймеры
    pub fn advance(&mut self, delta: f32) -> Vec<(TimerHandle, T)> {
        self.now += f64::from(delta.max(0.0));
        let now = self.now;

        let mut fired = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].due <= now {
                fired.push(self.pending.swap_remove(index));
            } else {
                index += 1;
            }
        }

        fired.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.handle.cmp(&b.handle)));
        fired
            .into_iter()
            .map(|timer| (timer.handle, timer.payload))
            .collect()
    }
}

/// Назначение таймера актора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum TimerKind {
    /// Следующая атака врага (attack cadence)
    Attack,
    /// Despawn после death анимации
    Death,
}

/// Payload таймеров симуляции
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerAction {
    pub actor: Entity,
    pub kind: TimerKind,
}

/// Глобальная очередь таймеров симуляции
pub type Scheduler = TimerQueue<TimerAction>;

/// Событие: таймер актора сработал
#[derive(Event, Debug, Clone, Copy)]
pub struct TimerFired {
    pub handle: TimerHandle,
    pub action: TimerAction,
}

/// Слоты таймеров актора
///
/// Инвариант: максимум один живой attack и один живой death таймер.
/// `arm` отменяет предыдущий handle того же назначения, поэтому два
/// таймера одного назначения никогда не сработают оба.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ActorTimers {
    pub attack: Option<TimerHandle>,
    pub death: Option<TimerHandle>,
}

impl ActorTimers {
    pub fn handle(&self, kind: TimerKind) -> Option<TimerHandle> {
        match kind {
            TimerKind::Attack => self.attack,
            TimerKind::Death => self.death,
        }
    }

    fn slot_mut(&mut self, kind: TimerKind) -> &mut Option<TimerHandle> {
        match kind {
            TimerKind::Attack => &mut self.attack,
            TimerKind::Death => &mut self.death,
        }
    }

    /// Перевзвести таймер (предыдущий того же kind отменяется)
    pub fn arm(
        &mut self,
        actor: Entity,
        kind: TimerKind,
        delay: f32,
        scheduler: &mut Scheduler,
    ) -> TimerHandle {
        if let Some(previous) = self.slot_mut(kind).take() {
            scheduler.cancel(previous);
        }

        let handle = scheduler.schedule(delay, TimerAction { actor, kind });
        *self.slot_mut(kind) = Some(handle);
        handle
    }

    pub fn cancel(&mut self, kind: TimerKind, scheduler: &mut Scheduler) -> bool {
        match self.slot_mut(kind).take() {
            Some(handle) => scheduler.cancel(handle),
            None => false,
        }
    }

    pub fn cancel_all(&mut self, scheduler: &mut Scheduler) {
        self.cancel(TimerKind::Attack, scheduler);
        self.cancel(TimerKind::Death, scheduler);
    }

    /// Принять сработавший handle: true если он актуален для слота
    /// (слот очищается), false если handle устарел
    pub fn take_fired(&mut self, kind: TimerKind, handle: TimerHandle) -> bool {
        let slot = self.slot_mut(kind);
        if *slot == Some(handle) {
            *slot = None;
            true
        } else {
            false
        }
    }
}
