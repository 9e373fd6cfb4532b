//! Standard atomic weights, used for CIP rule-2 mass comparison.

/// Standard atomic weight of the element with the given atomic number,
/// or `0.0` for out-of-range / query atoms.
///
/// Only the relative ordering matters to the priority comparator; an atom
/// with an explicit isotope bypasses this table entirely.
pub fn standard_atomic_weight(atomic_num: u8) -> f64 {
    if atomic_num == 0 || atomic_num as usize > ATOMIC_WEIGHTS.len() {
        return 0.0;
    }
    ATOMIC_WEIGHTS[atomic_num as usize - 1]
}

// IUPAC CIAAW 2021 standard atomic weights; for elements without stable
// isotopes, the mass number of the longest-lived isotope.
static ATOMIC_WEIGHTS: [f64; 118] = [
    1.008, 4.002602, 6.941, 9.0121831, 10.81, 12.011, 14.007, 15.999,
    18.998403163, 20.1797, // H..Ne
    22.98976928, 24.305, 26.9815384, 28.085, 30.973761998, 32.06, 35.45,
    39.948, // Na..Ar
    39.0983, 40.078, 44.955908, 47.867, 50.9415, 51.9961, 54.938043, 55.845,
    58.933194, 58.6934, 63.546, 65.38, 69.723, 72.630, 74.921595, 78.971,
    79.904, 83.798, // K..Kr
    85.4678, 87.62, 88.90584, 91.224, 92.90637, 95.95, 97.0, 101.07,
    102.90549, 106.42, 107.8682, 112.414, 114.818, 118.710, 121.760, 127.60,
    126.90447, 131.293, // Rb..Xe
    132.90545196, 137.327, 138.90547, 140.116, 140.90766, 144.242, 145.0,
    150.36, 151.964, 157.25, 158.925354, 162.500, 164.930328, 167.259,
    168.934218, 173.045, // Cs..Yb
    174.9668, 178.486, 180.94788, 183.84, 186.207, 190.23, 192.217, 195.084,
    196.966570, 200.592, 204.38, 207.2, 208.98040, 209.0, 210.0,
    222.0, // Lu..Rn
    223.0, 226.0, 227.0, 232.0377, 231.03588, 238.02891, 237.0, 244.0, 243.0,
    247.0, 247.0, 251.0, 252.0, 257.0, 258.0, 259.0, // Fr..No
    266.0, 267.0, 268.0, 269.0, 270.0, 277.0, 278.0, 281.0, 282.0, 285.0,
    286.0, 289.0, 290.0, 293.0, 294.0, 294.0, // Lr..Og
];
