pub mod ignore_colors;
