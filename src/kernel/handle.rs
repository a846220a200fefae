use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    error::{KernelError, Result},
    kernels::KernelType,
    param::{ParameterAddress, ParameterDescriptor, ParameterStore},
};

/*
Wavetable Handoff
=================

A new wavetable is built on the control thread and must reach the audio
thread without a lock, and the table it replaces must not be freed on the
audio thread. Two single-producer/single-consumer rings do both:

    control thread                          audio thread
    --------------                          ------------
    set_wavetable(table, slot)
      push (slot, table) ──── install ────►  block start: pop, swap into slot
      drop whatever comes ◄── retired ─────  push the table that was replaced

The audio thread only pops an install while there is room to retire the
table it replaces, so a replaced `Arc` is never dropped on its side.
*/

const INSTALL_CAPACITY: usize = 8;
const RETIRED_CAPACITY: usize = 16;

/// Single-cycle table shared between the control and audio threads.
pub type Wavetable = Arc<[f32]>;

/// Control-thread end of the wavetable rings.
pub(crate) struct WavetableSender {
    install: Producer<(usize, Wavetable)>,
    retired: Consumer<Wavetable>,
}

/// Audio-thread end of the wavetable rings.
pub(crate) struct WavetableReceiver {
    install: Consumer<(usize, Wavetable)>,
    retired: Producer<Wavetable>,
}

pub(crate) fn wavetable_channel() -> (WavetableSender, WavetableReceiver) {
    let (install_tx, install_rx) = RingBuffer::new(INSTALL_CAPACITY);
    let (retired_tx, retired_rx) = RingBuffer::new(RETIRED_CAPACITY);

    (
        WavetableSender {
            install: install_tx,
            retired: retired_rx,
        },
        WavetableReceiver {
            install: install_rx,
            retired: retired_tx,
        },
    )
}

impl WavetableSender {
    /// Drop every table the audio thread has handed back.
    fn collect_retired(&mut self) -> usize {
        let mut dropped = 0;
        while self.retired.pop().is_ok() {
            dropped += 1;
        }
        dropped
    }

    fn send(&mut self, slot: usize, table: Wavetable) -> Result<()> {
        self.collect_retired();
        self.install
            .push((slot, table))
            .map_err(|_| KernelError::WavetableQueueFull)
    }
}

impl WavetableReceiver {
    /// Install pending tables into `slots`. Realtime safe: no allocation, and
    /// replaced tables go back to the control thread.
    #[inline]
    pub(crate) fn receive(&mut self, slots: &mut [Option<Wavetable>]) {
        while !self.retired.is_full() {
            let Ok((index, table)) = self.install.pop() else {
                break;
            };
            let Some(slot) = slots.get_mut(index) else {
                // Indices are checked on the control side; keep the table
                // alive for the control thread anyway.
                let _ = self.retired.push(table);
                continue;
            };
            if let Some(old) = slot.replace(table) {
                let _ = self.retired.push(old);
            }
        }
    }
}

/// State shared between a kernel and its handles.
pub(crate) struct Shared {
    pub(crate) kind: KernelType,
    pub(crate) store: ParameterStore,
    wavetable_slots: usize,
    wavetables: Mutex<WavetableSender>,
    started: AtomicBool,
}

impl Shared {
    pub(crate) fn new(
        kind: KernelType,
        descriptors: &'static [ParameterDescriptor],
        wavetable_slots: usize,
        sender: WavetableSender,
    ) -> Self {
        Self {
            kind,
            store: ParameterStore::new(kind.name(), descriptors),
            wavetable_slots,
            wavetables: Mutex::new(sender),
            started: AtomicBool::new(true),
        }
    }

    /// Read by the audio thread once per block.
    #[inline]
    pub(crate) fn is_started(&self) -> bool {
        self.started.load(Ordering::Relaxed)
    }

    fn set_started(&self, started: bool) {
        if self.started.swap(started, Ordering::Relaxed) != started {
            tracing::debug!(kernel = self.kind.name(), started, "bypass toggled");
        }
    }

    pub(crate) fn set_wavetable(&self, table: Wavetable, index: usize) -> Result<()> {
        let kernel = self.kind.name();
        if self.wavetable_slots == 0 {
            return Err(KernelError::WavetablesUnsupported(kernel));
        }
        if index >= self.wavetable_slots {
            return Err(KernelError::UnknownWavetable { kernel, index });
        }
        if table.is_empty() {
            return Err(KernelError::EmptyWavetable);
        }

        let len = table.len();
        // A poisoned lock only means another control thread panicked mid-send;
        // the rings themselves are still consistent.
        let mut sender = self
            .wavetables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sender.send(index, table)?;

        tracing::debug!(kernel, index, len, "wavetable queued");
        Ok(())
    }
}

/// Cloneable, thread-safe control surface for one kernel instance.
///
/// A handle keeps the shared parameter store alive on its own. Writes made
/// after the kernel itself is dropped have no effect.
#[derive(Clone)]
pub struct KernelHandle {
    shared: Arc<Shared>,
}

impl KernelHandle {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    pub fn kernel_type(&self) -> KernelType {
        self.shared.kind
    }

    pub fn parameters(&self) -> &'static [ParameterDescriptor] {
        self.shared.store.descriptors()
    }

    /// See [`DspKernel::set_parameter_value`](crate::DspKernel::set_parameter_value).
    pub fn set_parameter_value(&self, address: ParameterAddress, value: f32) -> Result<f32> {
        self.shared.store.set(address, value)
    }

    /// Set a parameter by its stable identifier.
    pub fn set_parameter(&self, identifier: &str, value: f32) -> Result<f32> {
        let address = self.shared.store.address_of(identifier)?;
        self.shared.store.set(address, value)
    }

    /// Latest target written for `address`.
    pub fn parameter_value(&self, address: ParameterAddress) -> Option<f32> {
        self.shared.store.target(address)
    }

    pub fn address_of(&self, identifier: &str) -> Result<ParameterAddress> {
        self.shared.store.address_of(identifier)
    }

    pub fn set_ramp_duration(&self, seconds: f32) -> Result<()> {
        self.shared.store.set_ramp_duration(seconds)
    }

    pub fn ramp_duration(&self) -> f32 {
        self.shared.store.ramp_duration()
    }

    pub fn set_wavetable(&self, table: Arc<[f32]>, index: usize) -> Result<()> {
        self.shared.set_wavetable(table, index)
    }

    /// Resume processing at the next block boundary. Kernels start started.
    pub fn start(&self) {
        self.shared.set_started(true);
    }

    /// Bypass from the next block boundary: effects pass their input
    /// through, generators output silence. Parameter ramps keep moving.
    pub fn stop(&self) {
        self.shared.set_started(false);
    }

    pub fn is_started(&self) -> bool {
        self.shared.is_started()
    }
}

impl std::fmt::Debug for KernelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelHandle")
            .field("kernel", &self.shared.kind)
            .field("store", &self.shared.store)
            .field("started", &self.shared.is_started())
            .finish()
    }
}
