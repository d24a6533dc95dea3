#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntervalPokError {
    /// A sphere radius below 1 describes no interval.
    InvalidRadius,
    /// The inner-sphere derivation underflowed for these parameters.
    RadiusTooSmall {
        exponent: u32,
        epsilon: u32,
        security: u32,
    },
    /// Sphere products are defined for non-negative intervals only.
    NegativeSphere,
    /// No prime was found within the attempt budget.
    PrimeSearchExhausted,
    /// Mismatched object/variable/response counts.
    DimensionMismatch { expected: usize, found: usize },
    /// A relation referenced an object index beyond the object vector.
    ObjectOutOfRange(usize),
    /// A relation referenced a variable index beyond the sphere vector.
    VariableOutOfRange(usize),
    /// A base had no inverse modulo the group modulus.
    NonInvertibleElement,
}
