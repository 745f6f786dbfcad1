//! services/similarity.rs
//! Comparación de secuencias estilo Ratcliff/Obershelp (bloques comunes más largos),
//! con la misma regla de "autojunk" que difflib para secuencias largas.

use std::collections::HashMap;
use std::hash::Hash;

/// A partir de este largo de `b` se descartan los elementos "populares"
const AUTOJUNK_MIN_LEN: usize = 200;

/// Bloque común: `a[a..a+size] == b[b..b+size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// elemento de `b` -> posiciones (ascendentes) donde aparece.
    /// Los elementos populares no están aquí.
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, item) in b.iter().enumerate() {
            b2j.entry(item).or_default().push(j);
        }

        // Autojunk: en `b` largos, lo que aparece en más del 1% (+1) no inicia matches
        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Bloque común más largo en `a[alo..ahi]` y `b[blo..bhi]`.
    /// Empates: el que empieza antes en `a`, luego antes en `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        // j2len[j] = largo del match que termina en a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Extiende el bloque con elementos iguales a ambos lados
        // (incluye los populares, que no pueden iniciar un match)
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        Match {
            a: best_i,
            b: best_j,
            size: best_size,
        }
    }

    /// Bloques comunes ordenados, con bloques adyacentes fusionados.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
            blocks.push(m);
        }
        blocks.sort_by_key(|m| (m.a, m.b));

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len());
        for m in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == m.a && last.b + last.size == m.b => {
                    last.size += m.size;
                }
                _ => merged.push(m),
            }
        }
        merged
    }

    /// 2*M / T, en [0, 1]. Dos secuencias vacías cuentan como idénticas.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matched as f64 / total as f64
    }
}

/// Similitud de dos firmas lógicas en porcentaje (0..=100).
/// Se compara el texto "opcode\nopcode\n..." carácter por carácter.
pub fn logic_similarity_percent(a: &[String], b: &[String]) -> f64 {
    let a: Vec<char> = a.join("\n").chars().collect();
    let b: Vec<char> = b.join("\n").chars().collect();
    SequenceMatcher::new(&a, &b).ratio() * 100.0
}
