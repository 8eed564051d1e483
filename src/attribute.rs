use hifitime::{Duration, Epoch};

/// Value with provenance: the value and the [Epoch] it was last set at.
/// An [Attribute] that was never set holds nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<T> {
    inner: Option<(T, Epoch)>,
}

impl<T> Default for Attribute<T> {
    fn default() -> Self {
        Self { inner: None }
    }
}

impl<T> Attribute<T> {
    /// Stores `value`, stamped with `t`.
    pub fn set(&mut self, value: T, t: Epoch) {
        self.inner = Some((value, t));
    }

    pub fn is_set(&self) -> bool {
        self.inner.is_some()
    }

    pub fn value(&self) -> Option<&T> {
        self.inner.as_ref().map(|(value, _)| value)
    }

    pub fn timestamp(&self) -> Option<Epoch> {
        self.inner.as_ref().map(|(_, t)| *t)
    }

    pub fn get(&self) -> Option<(&T, Epoch)> {
        self.inner.as_ref().map(|(value, t)| (value, *t))
    }

    /// Age of this [Attribute] at `t`
    pub fn age(&self, t: Epoch) -> Option<Duration> {
        self.timestamp().map(|set_at| t - set_at)
    }
}

impl<T: Copy> Attribute<T> {
    /// Copy of the stored value
    pub fn copied(&self) -> Option<T> {
        self.value().copied()
    }
}

#[cfg(test)]
mod test {
    use super::Attribute;
    use hifitime::{Epoch, Unit};

    #[test]
    fn provenance() {
        let t0 = Epoch::from_gpst_seconds(100.0);
        let mut altitude = Attribute::<i32>::default();
        assert!(!altitude.is_set());
        assert!(altitude.age(t0).is_none());

        altitude.set(38000, t0);
        assert_eq!(altitude.copied(), Some(38000));
        assert_eq!(altitude.timestamp(), Some(t0));
        assert_eq!(altitude.age(t0 + 3.0 * Unit::Second), Some(3.0 * Unit::Second));

        let mut other = Attribute::<i32>::default();
        other.set(38000, t0 + 1.0 * Unit::Second);
        assert_ne!(altitude, other);
    }
}
