use honggfuzz::fuzz;
use stdpar::{
    adjacent_find, count, fallback, find_end, find_first_of, mismatch, search, search_n, Config, HostView,
    ParUnseq,
};

// First byte: tile size; second: split point between haystack and pattern.
fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if data.len() < 2 {
                return;
            }
            let tile_size = usize::from(data[0] % 16) + 1;
            let body = &data[2..];
            let split = usize::from(data[1]).min(body.len());
            let (hay, pat) = body.split_at(split);
            let policy = ParUnseq::with_config(Config {
                tile_size,
                ..Config::default()
            });

            let (h, p) = (HostView::Slice(hay), HostView::Slice(pat));
            let eq = |a: &u8, b: &u8| a == b;
            assert_eq!(search(&policy, hay, pat), fallback::search(&h, &p, &eq));
            assert_eq!(find_end(&policy, hay, pat), fallback::find_end(&h, &p, &eq));
            assert_eq!(find_first_of(&policy, hay, pat), fallback::find_first_of(&h, &p, &eq));
            assert_eq!(adjacent_find(&policy, hay), fallback::adjacent_find(&h, &eq));
            let value = pat.first().copied().unwrap_or(0);
            let run = pat.len() % 5;
            assert_eq!(search_n(&policy, hay, run, &value), fallback::search_n(&h, run, &value, &eq));
            assert_eq!(count(&policy, hay, &value), fallback::count_if(&h, &|x: &u8| *x == value));
            assert_eq!(mismatch(&policy, hay, pat), fallback::mismatch(&h, &p, &eq));
            assert_eq!(policy.device().ledger().live_allocations, 0);
        });
    }
}
