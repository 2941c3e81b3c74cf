mod cart;
mod mystery_box;
mod order;

pub(super) use cart::CartInMemRepo;
pub(super) use mystery_box::MysteryBoxInMemRepo;
pub(super) use order::OrderInMemRepo;
