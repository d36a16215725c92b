pub mod drawing;
pub mod frame_buffer;
pub mod layout;

pub use drawing::draw_board;
pub use frame_buffer::FrameBuffer;
pub use layout::BoardLayout;
