use cortex_m::asm;
use embedded_hal::blocking::delay::DelayMs;

// Cycle-counting delay for init, before the monotonic timer is running.
pub struct BusyDelay {
    cycles_per_ms: u32,
}

impl BusyDelay {
    pub fn new(sysclk_mhz: u32) -> Self {
        Self {
            cycles_per_ms: sysclk_mhz * 1000,
        }
    }
}

impl DelayMs<u32> for BusyDelay {
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            asm::delay(self.cycles_per_ms);
        }
    }
}
