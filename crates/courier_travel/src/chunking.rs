/// A stop as `[lat, lng]`.
pub type Waypoint = [f64; 2];

/// Maximum number of stops a single directions request may carry.
pub const MAX_STOPS_PER_CHUNK: usize = 25;

/// A trailing chunk must hold at least this many stops; shorter tails borrow
/// stops from the previous chunk.
pub const MIN_FINAL_CHUNK: usize = 3;

/// Splits an ordered stop sequence into request-sized chunks.
///
/// Consecutive chunks share their boundary stop so that every leg of the
/// original sequence is covered by exactly one chunk. When the tail chunk
/// would end up below [`MIN_FINAL_CHUNK`] stops, the final split point is
/// moved back into the previous chunk.
pub fn chunk_stops(stops: &[Waypoint]) -> Vec<Vec<Waypoint>> {
    if stops.len() <= MAX_STOPS_PER_CHUNK {
        return vec![stops.to_vec()];
    }

    // Chunk start indices; each chunk ends on the next chunk's start stop.
    let mut starts = vec![0usize];
    let mut start = 0;
    loop {
        let end = start + MAX_STOPS_PER_CHUNK;
        if end >= stops.len() {
            break;
        }
        start = end - 1;
        starts.push(start);
    }

    let last_start = *starts.last().unwrap();
    let final_len = stops.len() - last_start;
    if starts.len() > 1 && final_len < MIN_FINAL_CHUNK {
        *starts.last_mut().unwrap() = last_start - (MIN_FINAL_CHUNK - final_len);
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &chunk_start)| {
            let chunk_end = if i + 1 < starts.len() {
                starts[i + 1] + 1
            } else {
                stops.len()
            };
            stops[chunk_start..chunk_end].to_vec()
        })
        .collect()
}
