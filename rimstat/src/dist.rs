// SPDX-License-Identifier: MIT

//! Keyed distributions.
//!
//! A [`Distribution`] maps a non-negative integer key (a depth, a fan-out or a
//! size bucket) to a value. Missing keys read as zero. Entries are kept in
//! ascending key order, which the cumulative pass of the cooking stage and
//! every renderer rely on.

use core::{fmt, marker::PhantomData, ops::AddAssign};
use std::collections::BTreeMap;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

/// Numeric value stored in a distribution: `u64` for raw counts, `f64` once
/// cooked.
pub trait StatValue:
    Copy + Default + PartialEq + PartialOrd + AddAssign + fmt::Debug + fmt::Display
{
    const ZERO: Self;

    /// Label written in the header of persisted records.
    const KIND: &'static str;

    fn as_f64(self) -> f64;

    /// Short human form used by summary tables.
    fn render(self) -> String {
        self.to_string()
    }

    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl StatValue for u64 {
    const ZERO: Self = 0;
    const KIND: &'static str = "raw";

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl StatValue for f64 {
    const ZERO: Self = 0.0;
    const KIND: &'static str = "cooked";

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }

    fn render(self) -> String {
        format!("{self:.4}")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Distribution<V> {
    entries: BTreeMap<u64, V>,
}

impl<V: StatValue> Distribution<V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds `amount` to the value at `key`, creating it at zero first.
    #[inline]
    pub fn add(&mut self, key: u64, amount: V) {
        *self.entries.entry(key).or_default() += amount;
    }

    /// Overwrites the value at `key`.
    #[inline]
    pub fn set(&mut self, key: u64, value: V) {
        self.entries.insert(key, value);
    }

    /// Value at `key`, zero when absent.
    #[inline]
    pub fn get(&self, key: u64) -> V {
        self.entries.get(&key).copied().unwrap_or(V::ZERO)
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.entries.contains_key(&key)
    }

    /// Lazily yields `(key, value)` in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, V)> + '_ {
        self.entries.iter().map(|(&k, &v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn min_key(&self) -> Option<u64> {
        self.entries.keys().next().copied()
    }

    pub fn max_key(&self) -> Option<u64> {
        self.entries.keys().next_back().copied()
    }

    /// Sum of all values.
    pub fn total(&self) -> V {
        let mut total = V::ZERO;
        for v in self.entries.values() {
            total += *v;
        }
        total
    }

    /// Every value divided by `divisor`. `None` when `divisor` is zero.
    pub fn normalized(&self, divisor: V) -> Option<Distribution<f64>> {
        if divisor.is_zero() {
            return None;
        }
        let divisor = divisor.as_f64();
        Some(self.iter().map(|(k, v)| (k, v.as_f64() / divisor)).collect())
    }

    /// Running sum in ascending key order: each key holds its own value plus
    /// the values of every smaller key.
    pub fn cumulative(&self) -> Distribution<V> {
        let mut running = V::ZERO;
        self.iter()
            .map(|(k, v)| {
                running += v;
                (k, running)
            })
            .collect()
    }
}

impl Distribution<u64> {
    #[inline]
    pub fn incr(&mut self, key: u64) {
        self.add(key, 1);
    }

    /// `sum(key * value)`: for a fan-out histogram this is the number of
    /// children it describes.
    pub fn weighted_total(&self) -> u64 {
        self.iter().map(|(k, v)| k * v).sum()
    }
}

impl<V: StatValue> FromIterator<(u64, V)> for Distribution<V> {
    fn from_iter<I: IntoIterator<Item = (u64, V)>>(iter: I) -> Self {
        let mut dist = Distribution::new();
        for (k, v) in iter {
            dist.add(k, v);
        }
        dist
    }
}

impl<V: StatValue, const N: usize> From<[(u64, V); N]> for Distribution<V> {
    fn from(pairs: [(u64, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

// TOML tables only take string keys, so keys travel as decimal strings.
impl<V: Serialize> Serialize for Distribution<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(&k.to_string(), v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Distribution<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DistVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for DistVisitor<V> {
            type Value = Distribution<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table mapping non-negative integer keys to numbers")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = BTreeMap::new();
                while let Some(raw_key) = access.next_key::<String>()? {
                    let key = raw_key.trim().parse::<u64>().map_err(|_| {
                        serde::de::Error::custom(format!(
                            "invalid key '{raw_key}', expected a non-negative integer"
                        ))
                    })?;
                    let value = access.next_value::<V>()?;
                    if entries.insert(key, value).is_some() {
                        return Err(serde::de::Error::custom(format!("duplicate key {key}")));
                    }
                }
                Ok(Distribution { entries })
            }
        }

        deserializer.deserialize_map(DistVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_read_as_zero() {
        let mut dist = Distribution::<u64>::new();
        dist.incr(3);
        dist.incr(3);
        dist.add(7, 40);

        assert_eq!(dist.get(3), 2);
        assert_eq!(dist.get(7), 40);
        assert_eq!(dist.get(5), 0, "absent key must read as zero");
        assert!(!dist.contains_key(5), "get must not insert");
        assert_eq!(dist.total(), 42);
    }

    #[test]
    fn test_iter_is_key_ordered() {
        let dist = Distribution::from([(9u64, 1u64), (0, 4), (4, 2)]);
        let keys: Vec<u64> = dist.keys().collect();
        assert_eq!(keys, vec![0, 4, 9]);
        assert_eq!(dist.min_key(), Some(0));
        assert_eq!(dist.max_key(), Some(9));
    }

    #[test]
    fn test_cumulative() {
        let dist = Distribution::from([(2u64, 1u64), (0, 5), (1, 3)]);
        let cumul = dist.cumulative();
        assert_eq!(cumul, Distribution::<u64>::from([(0, 5), (1, 8), (2, 9)]));
    }

    #[test]
    fn test_normalized() {
        let dist = Distribution::from([(0u64, 1u64), (1, 3)]);
        let norm = dist.normalized(dist.total()).expect("non-zero total");
        assert_eq!(norm.get(0), 0.25);
        assert_eq!(norm.get(1), 0.75);
        assert!(dist.normalized(0).is_none(), "zero divisor must be refused");
    }

    #[test]
    fn test_weighted_total() {
        // two dirs with one file, one dir with none
        let fanout = Distribution::from([(1u64, 2u64), (0, 1)]);
        assert_eq!(fanout.weighted_total(), 2);
        assert_eq!(fanout.total(), 3);
    }
}
