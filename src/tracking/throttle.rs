//! Compuerta de escritura del seguimiento
//!
//! Decide, muestra por muestra, si una posición se envía al almacén.
//! Como máximo una escritura cada `TRACKING_INTERVAL_MS`.

/// Intervalo mínimo entre escrituras, en milisegundos
pub const TRACKING_INTERVAL_MS: i64 = 30_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThrottleGate {
    /// `None` hasta la primera muestra enviada
    last_forwarded_at: Option<i64>,
    skipped: u64,
}

impl ThrottleGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluar una muestra con timestamp en ms desde epoch.
    ///
    /// Si se admite, el instante queda registrado antes de que empiece
    /// la escritura y no se revierte aunque ésta falle.
    pub fn admit(&mut self, timestamp_ms: i64) -> bool {
        let forward = match self.last_forwarded_at {
            None => true,
            Some(last) => timestamp_ms - last >= TRACKING_INTERVAL_MS,
        };

        if forward {
            self.last_forwarded_at = Some(timestamp_ms);
        } else {
            self.skipped += 1;
        }
        forward
    }

    /// Volver al estado "nunca enviado"
    pub fn reset(&mut self) {
        self.last_forwarded_at = None;
        self.skipped = 0;
    }

    pub fn last_forwarded_at(&self) -> Option<i64> {
        self.last_forwarded_at
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_always_forwarded() {
        let mut gate = ThrottleGate::new();
        assert!(gate.admit(0));
        assert_eq!(gate.last_forwarded_at(), Some(0));
    }

    #[test]
    fn test_interval_sequence() {
        let mut gate = ThrottleGate::new();
        let samples = [0, 10_000, 29_999, 30_000, 60_001];

        let forwarded: Vec<i64> = samples.iter().copied().filter(|ts| gate.admit(*ts)).collect();

        assert_eq!(forwarded, vec![0, 30_000, 60_001]);
        assert_eq!(gate.skipped(), 2);
    }

    #[test]
    fn test_skipped_sample_does_not_move_window() {
        let mut gate = ThrottleGate::new();
        assert!(gate.admit(1_000));
        assert!(!gate.admit(20_000));
        assert_eq!(gate.last_forwarded_at(), Some(1_000));
        assert!(gate.admit(31_000));
    }

    #[test]
    fn test_reset_forwards_next_sample() {
        let mut gate = ThrottleGate::new();
        assert!(gate.admit(50_000));
        assert!(!gate.admit(50_001));

        gate.reset();
        assert_eq!(gate.last_forwarded_at(), None);
        assert!(gate.admit(50_002));
    }

    #[test]
    fn test_forwarded_within_window_bounded() {
        // Muestra cada 700 ms durante 5 minutos
        let mut gate = ThrottleGate::new();
        let timestamps: Vec<i64> = (0..430).map(|i| i * 700).collect();
        let forwarded: Vec<i64> = timestamps.iter().copied().filter(|ts| gate.admit(*ts)).collect();

        for window in [1_000_i64, 30_000, 45_000, 90_000, 200_000] {
            for start in timestamps.iter().copied() {
                let count = forwarded
                    .iter()
                    .filter(|ts| **ts >= start && **ts < start + window)
                    .count() as i64;
                assert!(count <= window / TRACKING_INTERVAL_MS + 1);
            }
        }
    }
}
