pub mod memory;
pub mod state;
pub mod store;

pub use memory::MemoryStore;
pub use state::AppState;
pub use store::{
    AppointmentStore, AppointmentUpdate, NewAppointment, NewSlot, SchedulingStore, SlotDeletion,
    SlotStore, SlotUpdate, StoreError,
};
