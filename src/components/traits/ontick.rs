pub trait OnTick {
    fn on_tick(&mut self);
}
