pub mod mock_blogs;
