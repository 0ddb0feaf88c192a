use std::io;

fn main() -> anyhow::Result<()> {
    xiangqi::print_engine_info();

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();

    let mut engine = xiangqi::Engine::new(&mut input, &mut output);
    engine.protocol_loop()
}
