use secded::ecc::bits::{parse_bits, to_bit_string};
use secded::ecc::hamming;
use secded::memory::CellStore;

fn main() -> secded::Result<()> {
    let mut store = CellStore::with_capacity(16);

    let data = parse_bits("10101100")?;
    let codeword = hamming::encode(&data)?;
    println!("Data:     {}", to_bit_string(&data));
    println!("Codeword: {} ({} bits)", to_bit_string(&codeword), codeword.len());
    store.write(0, &data, &codeword)?;

    store.flip_bit(0, 5)?;
    report(&store, 0)?;

    // Second flip on top of the first
    store.flip_bit(0, 7)?;
    report(&store, 0)?;

    store.restore(0)?;
    report(&store, 0)?;

    if let Some(next) = store.next_free_address() {
        println!("Next free address: {next}");
    }
    Ok(())
}

fn report(store: &CellStore, address: usize) -> secded::Result<()> {
    let Some(cell) = store.read(address) else {
        println!("Address {address} is empty");
        return Ok(());
    };
    let syndrome = hamming::analyze(cell.current());
    let correction = store.analyze(address)?;

    println!();
    println!("Received: {}", to_bit_string(cell.current()));
    if let Some(annotation) = cell.annotation() {
        println!("          ({annotation})");
    }
    println!(
        "Syndrome: {} (binary {:04b}), overall parity {}",
        syndrome.syndrome,
        syndrome.syndrome,
        if syndrome.overall_parity_odd { "fails" } else { "ok" }
    );
    println!(
        "Result:   {} (position {})",
        correction.classification, correction.position
    );
    println!("Decoded:  {}", to_bit_string(&correction.codeword));
    Ok(())
}
